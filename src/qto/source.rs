//! Property-graph collaborators consumed by the take-off.
//!
//! Lookups are async so a model may fetch or decode data lazily. The
//! in-crate [`StepModel`](crate::parser::StepModel) answers from memory.

use async_trait::async_trait;

use crate::error::QtoError;
use crate::model::{ElementId, ModelId, PropertyRecord};

/// Relationship names understood by [`PropertyModel::relations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Element to the property definitions attached to it.
    IsDefinedBy,
}

impl Relation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::IsDefinedBy => "IsDefinedBy",
        }
    }
}

/// One loaded building model.
///
/// Only [`get_properties`](Self::get_properties) and
/// [`relations`](Self::relations) are required; name, child and value
/// resolution fall back to the typed record.
#[async_trait]
pub trait PropertyModel: Send + Sync {
    fn model_id(&self) -> &ModelId;

    /// Whether property data is loaded for this model.
    fn has_property_data(&self) -> bool;

    /// Typed record for `id`, `Ok(None)` if it does not exist.
    async fn get_properties(&self, id: ElementId) -> Result<Option<PropertyRecord>, QtoError>;

    /// Related record ids, `None` when the element has no such relation.
    fn relations(&self, element: ElementId, relation: Relation) -> Option<Vec<ElementId>>;

    async fn entity_name(&self, id: ElementId) -> Result<Option<String>, QtoError> {
        Ok(self.get_properties(id).await?.and_then(|record| record.name))
    }

    /// Child quantity ids of a quantity set, in declaration order.
    async fn quantity_set_children(&self, qset: ElementId) -> Result<Vec<ElementId>, QtoError> {
        Ok(self
            .get_properties(qset)
            .await?
            .map(|record| record.quantity_ids().to_vec())
            .unwrap_or_default())
    }

    async fn quantity_value(&self, id: ElementId) -> Result<Option<f64>, QtoError> {
        Ok(self
            .get_properties(id)
            .await?
            .and_then(|record| record.quantity_value()))
    }
}

/// Resolves model ids referenced by a selection to loaded models.
pub trait ModelResolver: Send + Sync {
    fn resolve(&self, model: &ModelId) -> Option<&dyn PropertyModel>;
}
