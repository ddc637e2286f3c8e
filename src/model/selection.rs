use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// STEP express id of an entity within its model.
pub type ElementId = u64;

/// Identifies one loaded building model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ModelId(String);

impl ModelId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque picking handle grouping element ids inside a model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FragmentId(String);

impl FragmentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FragmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Currently picked elements, grouped by model and then by fragment.
///
/// Keys are ordered so iteration is deterministic. A model appears at most
/// once no matter how many fragments reference it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    models: BTreeMap<ModelId, BTreeMap<FragmentId, BTreeSet<ElementId>>>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one element; returns `false` if it was already selected.
    pub fn insert(&mut self, model: ModelId, fragment: FragmentId, element: ElementId) -> bool {
        self.models
            .entry(model)
            .or_default()
            .entry(fragment)
            .or_default()
            .insert(element)
    }

    pub fn extend<I>(&mut self, model: &ModelId, fragment: &FragmentId, elements: I)
    where
        I: IntoIterator<Item = ElementId>,
    {
        self.models
            .entry(model.clone())
            .or_default()
            .entry(fragment.clone())
            .or_default()
            .extend(elements);
    }

    /// Removes one element, pruning fragments and models left empty.
    pub fn remove(&mut self, model: &ModelId, fragment: &FragmentId, element: ElementId) -> bool {
        let Some(fragments) = self.models.get_mut(model) else {
            return false;
        };
        let Some(elements) = fragments.get_mut(fragment) else {
            return false;
        };
        let removed = elements.remove(&element);
        if elements.is_empty() {
            fragments.remove(fragment);
        }
        if fragments.is_empty() {
            self.models.remove(model);
        }
        removed
    }

    #[must_use]
    pub fn contains(&self, model: &ModelId, fragment: &FragmentId, element: ElementId) -> bool {
        self.models
            .get(model)
            .and_then(|fragments| fragments.get(fragment))
            .is_some_and(|elements| elements.contains(&element))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Total number of element entries across all models and fragments.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.models
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }

    /// Distinct models touched by the selection.
    pub fn models(&self) -> impl Iterator<Item = &ModelId> {
        self.models.keys()
    }

    /// Fragment entries that belong to `model`.
    pub fn fragments(
        &self,
        model: &ModelId,
    ) -> impl Iterator<Item = (&FragmentId, &BTreeSet<ElementId>)> {
        self.models.get(model).into_iter().flat_map(BTreeMap::iter)
    }

    pub fn clear(&mut self) {
        self.models.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_model_through_two_fragments_is_one_model() {
        let model = ModelId::new("house");
        let mut selection = Selection::new();
        selection.insert(model.clone(), FragmentId::new("IFCWALL"), 1);
        selection.insert(model.clone(), FragmentId::new("IFCSLAB"), 2);

        assert_eq!(selection.models().count(), 1);
        assert_eq!(selection.fragments(&model).count(), 2);
        assert_eq!(selection.element_count(), 2);
    }

    #[test]
    fn remove_prunes_empty_entries() {
        let model = ModelId::new("house");
        let fragment = FragmentId::new("IFCWALL");
        let mut selection = Selection::new();
        assert!(selection.insert(model.clone(), fragment.clone(), 7));
        assert!(!selection.insert(model.clone(), fragment.clone(), 7));
        assert!(selection.contains(&model, &fragment, 7));

        assert!(selection.remove(&model, &fragment, 7));
        assert!(selection.is_empty());
        assert!(!selection.remove(&model, &fragment, 7));
    }

    #[test]
    fn unknown_model_has_no_fragments() {
        let selection = Selection::new();
        assert_eq!(selection.fragments(&ModelId::new("missing")).count(), 0);
    }
}
