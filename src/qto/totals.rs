use serde::Serialize;
use std::collections::BTreeMap;

/// `quantity set name -> quantity name -> value`, the export shape.
pub type FlatReport = BTreeMap<String, BTreeMap<String, f64>>;

/// Running sums keyed by quantity-set name, then quantity name.
///
/// Only [`QuantityTakeoff`](super::QuantityTakeoff) mutates totals; other
/// code reads them or builds a detached snapshot with `From<FlatReport>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QuantityTotals {
    sets: FlatReport,
}

impl QuantityTotals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty entry for `set`; returns `true` on first sight.
    pub(crate) fn ensure_set(&mut self, set: &str) -> bool {
        if self.sets.contains_key(set) {
            return false;
        }
        self.sets.insert(set.to_string(), BTreeMap::new());
        true
    }

    pub(crate) fn add(&mut self, set: &str, quantity: &str, value: f64) {
        *self
            .sets
            .entry(set.to_string())
            .or_default()
            .entry(quantity.to_string())
            .or_insert(0.0) += value;
    }

    pub(crate) fn clear(&mut self) {
        self.sets.clear();
    }

    #[must_use]
    pub fn get(&self, set: &str, quantity: &str) -> Option<f64> {
        self.sets.get(set)?.get(quantity).copied()
    }

    #[must_use]
    pub fn set(&self, set: &str) -> Option<&BTreeMap<String, f64>> {
        self.sets.get(set)
    }

    pub fn sets(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, f64>)> {
        self.sets.iter()
    }

    /// Number of quantity sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of (set, quantity) leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.sets.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn as_map(&self) -> &FlatReport {
        &self.sets
    }
}

impl From<FlatReport> for QuantityTotals {
    fn from(sets: FlatReport) -> Self {
        Self { sets }
    }
}
