use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::error::ParseError;
use crate::model::{ElementSummary, ModelId};
use crate::parser::ifc::{parse_ifc_file, StepModel};
use crate::qto::{ModelResolver, PropertyModel};

/// Loaded models keyed by id.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<ModelId, StepModel>,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every file in `paths` into one registry.
    pub fn load<I, P>(paths: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut registry = Self::new();
        for path in paths {
            let model = parse_ifc_file(path)?;
            info!(
                model = %model.id(),
                project = model.project_name(),
                elements = model.elements().len(),
                "model loaded"
            );
            registry.insert(model)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, model: StepModel) -> Result<(), ParseError> {
        if self.models.contains_key(model.id()) {
            return Err(ParseError::DuplicateModel {
                model: model.id().to_string(),
            });
        }
        self.models.insert(model.id().clone(), model);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &ModelId) -> Option<&StepModel> {
        self.models.get(id)
    }

    pub fn models(&self) -> impl Iterator<Item = &StepModel> {
        self.models.values()
    }

    /// Selectable elements of every model, model by model.
    pub fn elements(&self) -> impl Iterator<Item = &ElementSummary> {
        self.models.values().flat_map(|m| m.elements().iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelResolver for ModelRegistry {
    fn resolve(&self, model: &ModelId) -> Option<&dyn PropertyModel> {
        self.models.get(model).map(|m| m as &dyn PropertyModel)
    }
}
