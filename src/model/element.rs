use super::{ElementId, FragmentId, ModelId};
use serde::Serialize;

/// A selectable element that carries at least one property definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementSummary {
    pub model: ModelId,
    pub id: ElementId,
    pub entity_type: String,
    pub name: Option<String>,
}

impl ElementSummary {
    /// Fragment handle the element is picked through (its entity class).
    #[must_use]
    pub fn fragment(&self) -> FragmentId {
        FragmentId::new(&self.entity_type)
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("#{}", self.id),
        }
    }
}
