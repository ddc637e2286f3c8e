use std::collections::HashSet;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::report::{self, QtoTreeRow};
use super::source::{ModelResolver, PropertyModel, Relation};
use super::totals::{FlatReport, QuantityTotals};
use crate::config::{LookupFailurePolicy, TakeoffConfig, ZeroValuePolicy};
use crate::error::{ExportError, QtoError};
use crate::export::DownloadSink;
use crate::model::{ElementId, Selection};

/// Counters for one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TakeoffStats {
    pub models_processed: usize,
    pub models_skipped: usize,
    pub elements_visited: usize,
    pub elements_without_relations: usize,
    pub quantity_sets: usize,
    pub quantities_added: usize,
    pub quantities_skipped: usize,
    pub lookup_failures: usize,
}

/// Quantities one element contributes, committed only once the element is done.
#[derive(Debug, Default)]
struct ElementContribution {
    sets: Vec<(String, Vec<(String, f64)>)>,
}

/// Owns the accumulated totals and the passes that add to them.
///
/// Passes take `&mut self`, so two overlapping aggregations on the same
/// instance cannot be in flight at once.
#[derive(Debug, Default)]
pub struct QuantityTakeoff {
    totals: QuantityTotals,
    config: TakeoffConfig,
}

impl QuantityTakeoff {
    #[must_use]
    pub fn new(config: TakeoffConfig) -> Self {
        Self {
            totals: QuantityTotals::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TakeoffConfig {
        &self.config
    }

    #[must_use]
    pub fn totals(&self) -> &QuantityTotals {
        &self.totals
    }

    /// Adds every quantity reachable from `selection` to the running totals.
    ///
    /// Totals are never reset here: summing the same selection twice doubles
    /// every value. Use [`aggregate_selection`](Self::aggregate_selection)
    /// to start a fresh session. Each model is traversed once per call.
    pub async fn sum_quantities(
        &mut self,
        resolver: &dyn ModelResolver,
        selection: &Selection,
    ) -> Result<TakeoffStats, QtoError> {
        let started = Instant::now();
        let mut stats = TakeoffStats::default();

        for model_id in selection.models() {
            let Some(model) = resolver.resolve(model_id) else {
                debug!(model = %model_id, "model not loaded, skipping");
                stats.models_skipped += 1;
                continue;
            };
            if !model.has_property_data() {
                debug!(model = %model_id, "model has no property data, skipping");
                stats.models_skipped += 1;
                continue;
            }
            stats.models_processed += 1;

            // Fragments are opaque; one element may be listed under several.
            let mut visited: HashSet<ElementId> = HashSet::new();
            for (fragment, elements) in selection.fragments(model_id) {
                trace!(model = %model_id, %fragment, elements = elements.len(), "fragment");

                for &element in elements {
                    if !visited.insert(element) {
                        trace!(model = %model_id, %fragment, element, "element already visited");
                        continue;
                    }
                    stats.elements_visited += 1;
                    match self.collect_element(model, element, &mut stats).await {
                        Ok(Some(contribution)) => self.commit(contribution, &mut stats),
                        Ok(None) => {}
                        Err(err) => match self.config.on_lookup_error {
                            LookupFailurePolicy::Abort => return Err(err),
                            LookupFailurePolicy::SkipElement => {
                                warn!(model = %model_id, element, error = %err, "lookup failed, element skipped");
                                stats.lookup_failures += 1;
                            }
                        },
                    }
                }
            }
        }

        info!(
            models = stats.models_processed,
            elements = stats.elements_visited,
            quantities = stats.quantities_added,
            sets = self.totals.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "quantity take-off pass finished"
        );
        Ok(stats)
    }

    /// Clears the totals and sums `selection` as one session.
    ///
    /// On an aborted pass the totals hold whatever was summed before the
    /// failing element.
    pub async fn aggregate_selection(
        &mut self,
        resolver: &dyn ModelResolver,
        selection: &Selection,
    ) -> Result<TakeoffStats, QtoError> {
        self.clear();
        self.sum_quantities(resolver, selection).await
    }

    /// Resets the totals; call whenever the selection is cleared.
    pub fn clear(&mut self) {
        debug!(sets = self.totals.len(), "clearing quantity totals");
        self.totals.clear();
    }

    /// Tears the take-off down, dropping all accumulated state.
    pub fn dispose(mut self) {
        self.clear();
        debug!("quantity take-off disposed");
    }

    #[must_use]
    pub fn flat_report(&self) -> FlatReport {
        report::flat_report(&self.totals)
    }

    #[must_use]
    pub fn tree_report(&self) -> Vec<QtoTreeRow> {
        report::tree_report(&self.totals)
    }

    /// Hands the JSON export to `sink`; returns the file name used.
    pub fn export_to(
        &self,
        sink: &mut dyn DownloadSink,
        file_name: Option<&str>,
    ) -> Result<String, ExportError> {
        report::export_to_file(&self.totals, sink, file_name)
    }

    async fn collect_element(
        &self,
        model: &dyn PropertyModel,
        element: ElementId,
        stats: &mut TakeoffStats,
    ) -> Result<Option<ElementContribution>, QtoError> {
        let Some(definitions) = model
            .relations(element, Relation::IsDefinedBy)
            .filter(|ids| !ids.is_empty())
        else {
            trace!(element, relation = Relation::IsDefinedBy.as_str(), "no relations");
            stats.elements_without_relations += 1;
            return Ok(None);
        };

        let mut contribution = ElementContribution::default();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for qset_id in definitions {
            let record = model.get_properties(qset_id).await?;
            let set_name = model.entity_name(qset_id).await?;

            let set_name = match (record, set_name) {
                (Some(record), Some(name)) if record.is_element_quantity_set() => name,
                _ => {
                    trace!(element, qset_id, "not a named element quantity set");
                    continue;
                }
            };
            stats.quantity_sets += 1;

            let mut quantities = Vec::new();
            for quantity_id in model.quantity_set_children(qset_id).await? {
                let name = model.entity_name(quantity_id).await?;
                let value = model.quantity_value(quantity_id).await?;

                let (Some(name), Some(value)) = (name, self.accepted_value(value)) else {
                    trace!(element, quantity_id, "quantity without name or value");
                    stats.quantities_skipped += 1;
                    continue;
                };
                if !seen.insert((set_name.clone(), name.clone())) {
                    trace!(element, set = %set_name, quantity = %name, "duplicate quantity for element");
                    stats.quantities_skipped += 1;
                    continue;
                }
                quantities.push((name, value));
            }
            contribution.sets.push((set_name, quantities));
        }

        Ok(Some(contribution))
    }

    fn accepted_value(&self, value: Option<f64>) -> Option<f64> {
        let value = value.filter(|v| v.is_finite())?;
        match self.config.zero_values {
            ZeroValuePolicy::Skip if value == 0.0 => None,
            _ => Some(value),
        }
    }

    fn commit(&mut self, contribution: ElementContribution, stats: &mut TakeoffStats) {
        for (set, quantities) in contribution.sets {
            if self.totals.ensure_set(&set) {
                debug!(set = %set, "new quantity set row");
            }
            for (name, value) in quantities {
                self.totals.add(&set, &name, value);
                stats.quantities_added += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::model::{FragmentId, ModelId, PropertyRecord, QuantityMeasure, RecordKind};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const WALL_QTO: &str = "Qto_WallBaseQuantities";

    /// Hand-built property graph with lookup counting and failure injection.
    struct FakeModel {
        id: ModelId,
        no_properties: bool,
        records: HashMap<ElementId, PropertyRecord>,
        defined_by: HashMap<ElementId, Vec<ElementId>>,
        children: HashMap<ElementId, Vec<ElementId>>,
        failing: HashSet<ElementId>,
        lookups: AtomicUsize,
    }

    impl FakeModel {
        fn new(id: &str) -> Self {
            Self {
                id: ModelId::new(id),
                no_properties: false,
                records: HashMap::new(),
                defined_by: HashMap::new(),
                children: HashMap::new(),
                failing: HashSet::new(),
                lookups: AtomicUsize::new(0),
            }
        }

        fn quantity(&mut self, id: ElementId, name: Option<&str>, value: Option<f64>) {
            self.records.insert(
                id,
                PropertyRecord {
                    id,
                    name: name.map(str::to_string),
                    kind: RecordKind::Quantity {
                        measure: QuantityMeasure::Volume,
                        value,
                    },
                },
            );
        }

        fn qset(&mut self, id: ElementId, name: &str, quantities: Vec<ElementId>) {
            self.records.insert(
                id,
                PropertyRecord {
                    id,
                    name: Some(name.to_string()),
                    kind: RecordKind::ElementQuantitySet { quantities },
                },
            );
        }

        fn pset(&mut self, id: ElementId, name: &str) {
            self.records.insert(
                id,
                PropertyRecord {
                    id,
                    name: Some(name.to_string()),
                    kind: RecordKind::PropertySet,
                },
            );
        }

        fn define(&mut self, element: ElementId, definitions: Vec<ElementId>) {
            self.defined_by.insert(element, definitions);
        }
    }

    #[async_trait]
    impl PropertyModel for FakeModel {
        fn model_id(&self) -> &ModelId {
            &self.id
        }

        fn has_property_data(&self) -> bool {
            !self.no_properties
        }

        async fn get_properties(&self, id: ElementId) -> Result<Option<PropertyRecord>, QtoError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&id) {
                return Err(QtoError::Lookup {
                    model: self.id.to_string(),
                    id,
                    message: "decode failed".to_string(),
                });
            }
            Ok(self.records.get(&id).cloned())
        }

        fn relations(&self, element: ElementId, relation: Relation) -> Option<Vec<ElementId>> {
            assert_eq!(relation, Relation::IsDefinedBy);
            self.defined_by.get(&element).cloned()
        }

        async fn quantity_set_children(
            &self,
            qset: ElementId,
        ) -> Result<Vec<ElementId>, QtoError> {
            if let Some(children) = self.children.get(&qset) {
                return Ok(children.clone());
            }
            Ok(self
                .get_properties(qset)
                .await?
                .map(|record| record.quantity_ids().to_vec())
                .unwrap_or_default())
        }
    }

    struct Models(Vec<FakeModel>);

    impl ModelResolver for Models {
        fn resolve(&self, model: &ModelId) -> Option<&dyn PropertyModel> {
            self.0
                .iter()
                .find(|m| &m.id == model)
                .map(|m| m as &dyn PropertyModel)
        }
    }

    /// Two walls: NetVolume 5 and 7, plus a Length on the first.
    fn two_walls() -> FakeModel {
        let mut model = FakeModel::new("house");
        model.quantity(101, Some("NetVolume"), Some(5.0));
        model.quantity(102, Some("Length"), Some(4.0));
        model.qset(100, WALL_QTO, vec![101, 102]);
        model.quantity(201, Some("NetVolume"), Some(7.0));
        model.qset(200, WALL_QTO, vec![201]);
        model.define(1, vec![100]);
        model.define(2, vec![200]);
        model
    }

    fn select(pairs: &[(&str, &str, ElementId)]) -> Selection {
        let mut selection = Selection::new();
        for (model, fragment, id) in pairs {
            selection.insert(ModelId::new(*model), FragmentId::new(*fragment), *id);
        }
        selection
    }

    fn walls_selection() -> Selection {
        select(&[("house", "IFCWALL", 1), ("house", "IFCWALL", 2)])
    }

    #[tokio::test]
    async fn sums_across_elements() {
        let models = Models(vec![two_walls()]);
        let mut qto = QuantityTakeoff::default();

        let stats = qto.sum_quantities(&models, &walls_selection()).await.unwrap();

        assert_eq!(qto.totals().get(WALL_QTO, "NetVolume"), Some(12.0));
        assert_eq!(qto.totals().get(WALL_QTO, "Length"), Some(4.0));
        assert_eq!(stats.models_processed, 1);
        assert_eq!(stats.elements_visited, 2);
        assert_eq!(stats.quantity_sets, 2);
        assert_eq!(stats.quantities_added, 3);
    }

    #[tokio::test]
    async fn repeated_sum_without_clear_doubles() {
        let models = Models(vec![two_walls()]);
        let selection = walls_selection();
        let mut qto = QuantityTakeoff::default();

        qto.sum_quantities(&models, &selection).await.unwrap();
        let first = qto.flat_report();
        qto.sum_quantities(&models, &selection).await.unwrap();

        for (set, quantities) in &first {
            for (name, value) in quantities {
                assert_eq!(qto.totals().get(set, name), Some(value * 2.0));
            }
        }
    }

    #[tokio::test]
    async fn clear_then_sum_matches_fresh_instance() {
        let models = Models(vec![two_walls()]);
        let selection = walls_selection();

        let mut fresh = QuantityTakeoff::default();
        fresh.sum_quantities(&models, &selection).await.unwrap();

        let mut reused = QuantityTakeoff::default();
        reused.sum_quantities(&models, &selection).await.unwrap();
        reused.sum_quantities(&models, &selection).await.unwrap();
        reused.clear();
        reused.sum_quantities(&models, &selection).await.unwrap();

        assert_eq!(reused.flat_report(), fresh.flat_report());
    }

    #[tokio::test]
    async fn aggregate_selection_starts_a_new_session() {
        let models = Models(vec![two_walls()]);
        let mut qto = QuantityTakeoff::default();

        qto.aggregate_selection(&models, &walls_selection()).await.unwrap();
        qto.aggregate_selection(&models, &select(&[("house", "IFCWALL", 2)]))
            .await
            .unwrap();

        assert_eq!(qto.totals().get(WALL_QTO, "NetVolume"), Some(7.0));
        assert_eq!(qto.totals().get(WALL_QTO, "Length"), None);
    }

    #[tokio::test]
    async fn property_sets_contribute_nothing() {
        let mut model = FakeModel::new("house");
        model.quantity(11, Some("Width"), Some(3.0));
        model.pset(10, "Pset_WallCommon");
        // Named, with a numeric child, but not an element quantity set.
        model.children.insert(10, vec![11]);
        model.define(1, vec![10]);
        let models = Models(vec![model]);
        let mut qto = QuantityTakeoff::default();

        let stats = qto
            .sum_quantities(&models, &select(&[("house", "IFCWALL", 1)]))
            .await
            .unwrap();

        assert!(qto.totals().is_empty());
        assert_eq!(stats.quantity_sets, 0);
    }

    #[tokio::test]
    async fn nameless_quantity_creates_no_entry() {
        let mut model = FakeModel::new("house");
        model.quantity(11, None, Some(3.0));
        model.qset(10, WALL_QTO, vec![11]);
        model.define(1, vec![10]);
        let models = Models(vec![model]);
        let mut qto = QuantityTakeoff::default();

        let stats = qto
            .sum_quantities(&models, &select(&[("house", "IFCWALL", 1)]))
            .await
            .unwrap();

        // The set row exists from first sight, but holds no quantities.
        assert_eq!(qto.totals().leaf_count(), 0);
        assert_eq!(qto.totals().set(WALL_QTO).map(|s| s.len()), Some(0));
        assert_eq!(stats.quantities_skipped, 1);
    }

    #[tokio::test]
    async fn zero_values_follow_policy() {
        let build = || {
            let mut model = FakeModel::new("house");
            model.quantity(11, Some("OpeningArea"), Some(0.0));
            model.quantity(12, Some("Broken"), Some(f64::NAN));
            model.qset(10, WALL_QTO, vec![11, 12]);
            model.define(1, vec![10]);
            Models(vec![model])
        };
        let selection = select(&[("house", "IFCWALL", 1)]);

        let mut skipping = QuantityTakeoff::default();
        skipping.sum_quantities(&build(), &selection).await.unwrap();
        assert_eq!(skipping.totals().get(WALL_QTO, "OpeningArea"), None);

        let mut keeping = QuantityTakeoff::new(TakeoffConfig {
            zero_values: ZeroValuePolicy::Keep,
            ..TakeoffConfig::default()
        });
        keeping.sum_quantities(&build(), &selection).await.unwrap();
        assert_eq!(keeping.totals().get(WALL_QTO, "OpeningArea"), Some(0.0));
        assert_eq!(keeping.totals().get(WALL_QTO, "Broken"), None);
    }

    #[tokio::test]
    async fn element_counts_each_quantity_once() {
        let mut model = FakeModel::new("house");
        model.quantity(11, Some("NetVolume"), Some(2.0));
        model.qset(10, WALL_QTO, vec![11, 11]);
        model.define(1, vec![10, 10]);
        let models = Models(vec![model]);
        let mut qto = QuantityTakeoff::default();

        qto.sum_quantities(&models, &select(&[("house", "IFCWALL", 1)]))
            .await
            .unwrap();

        assert_eq!(qto.totals().get(WALL_QTO, "NetVolume"), Some(2.0));
    }

    #[tokio::test]
    async fn model_reached_through_two_fragments_is_traversed_once() {
        let models = Models(vec![two_walls()]);
        let mut qto = QuantityTakeoff::default();
        let selection = select(&[("house", "IFCWALL", 1), ("house", "IFCWALLSTANDARDCASE", 2)]);

        let stats = qto.sum_quantities(&models, &selection).await.unwrap();

        assert_eq!(stats.models_processed, 1);
        assert_eq!(qto.totals().get(WALL_QTO, "NetVolume"), Some(12.0));
    }

    #[tokio::test]
    async fn element_under_two_fragments_counts_once() {
        let models = Models(vec![two_walls()]);
        let mut qto = QuantityTakeoff::default();
        let selection = select(&[("house", "frag-a", 1), ("house", "frag-b", 1)]);

        let stats = qto.sum_quantities(&models, &selection).await.unwrap();

        assert_eq!(stats.elements_visited, 1);
        assert_eq!(qto.totals().get(WALL_QTO, "NetVolume"), Some(5.0));
        assert_eq!(qto.totals().get(WALL_QTO, "Length"), Some(4.0));
    }

    #[tokio::test]
    async fn non_finite_values_are_skipped() {
        let mut model = FakeModel::new("house");
        model.quantity(11, Some("NetVolume"), Some(f64::INFINITY));
        model.quantity(12, Some("Length"), Some(f64::NEG_INFINITY));
        model.quantity(13, Some("Height"), Some(3.0));
        model.qset(10, WALL_QTO, vec![11, 12, 13]);
        model.define(1, vec![10]);
        let models = Models(vec![model]);
        let mut qto = QuantityTakeoff::new(TakeoffConfig {
            zero_values: ZeroValuePolicy::Keep,
            ..TakeoffConfig::default()
        });

        let stats = qto
            .sum_quantities(&models, &select(&[("house", "IFCWALL", 1)]))
            .await
            .unwrap();

        assert_eq!(stats.quantities_skipped, 2);
        let mut sink = MemorySink::default();
        qto.export_to(&mut sink, None).unwrap();
        let parsed: FlatReport = serde_json::from_str(&sink.downloads[0].1).unwrap();
        assert_eq!(parsed, qto.flat_report());
        assert_eq!(qto.totals().get(WALL_QTO, "Height"), Some(3.0));
    }

    #[tokio::test]
    async fn lookup_count_is_independent_of_fragment_split() {
        let selection_one = walls_selection();
        let selection_two = select(&[("house", "IFCWALL", 1), ("house", "IFCSLAB", 2)]);

        let one = Models(vec![two_walls()]);
        QuantityTakeoff::default()
            .sum_quantities(&one, &selection_one)
            .await
            .unwrap();
        let two = Models(vec![two_walls()]);
        QuantityTakeoff::default()
            .sum_quantities(&two, &selection_two)
            .await
            .unwrap();

        assert_eq!(
            one.0[0].lookups.load(Ordering::SeqCst),
            two.0[0].lookups.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn skips_missing_and_propertyless_models() {
        let mut bare = FakeModel::new("bare");
        bare.no_properties = true;
        let models = Models(vec![two_walls(), bare]);
        let selection = select(&[
            ("house", "IFCWALL", 1),
            ("bare", "IFCWALL", 1),
            ("ghost", "IFCWALL", 1),
            ("house", "IFCWALL", 99),
        ]);
        let mut qto = QuantityTakeoff::default();

        let stats = qto.sum_quantities(&models, &selection).await.unwrap();

        assert_eq!(stats.models_processed, 1);
        assert_eq!(stats.models_skipped, 2);
        assert_eq!(stats.elements_without_relations, 1);
        assert_eq!(qto.totals().get(WALL_QTO, "NetVolume"), Some(5.0));
    }

    #[tokio::test]
    async fn empty_selection_is_a_no_op() {
        let models = Models(vec![two_walls()]);
        let mut qto = QuantityTakeoff::default();
        let stats = qto.sum_quantities(&models, &Selection::new()).await.unwrap();
        assert_eq!(stats, TakeoffStats::default());
        assert!(qto.totals().is_empty());
    }

    #[tokio::test]
    async fn lookup_failure_aborts_by_default() {
        let mut model = two_walls();
        model.failing.insert(200);
        let models = Models(vec![model]);
        let mut qto = QuantityTakeoff::default();

        let err = qto
            .sum_quantities(&models, &walls_selection())
            .await
            .unwrap_err();

        assert!(matches!(err, QtoError::Lookup { id: 200, .. }));
        // Element 1 was committed before element 2 failed.
        assert_eq!(qto.totals().get(WALL_QTO, "NetVolume"), Some(5.0));
    }

    #[tokio::test]
    async fn lookup_failure_can_skip_the_element() {
        let mut model = two_walls();
        model.quantity(103, Some("Height"), Some(3.0));
        model.qset(100, WALL_QTO, vec![101, 102, 103]);
        model.failing.insert(103);
        let models = Models(vec![model]);
        let mut qto = QuantityTakeoff::new(TakeoffConfig {
            on_lookup_error: LookupFailurePolicy::SkipElement,
            ..TakeoffConfig::default()
        });

        let stats = qto.sum_quantities(&models, &walls_selection()).await.unwrap();

        // Element 1 failed half-way and left no partial sums behind.
        assert_eq!(stats.lookup_failures, 1);
        assert_eq!(qto.totals().get(WALL_QTO, "NetVolume"), Some(7.0));
        assert_eq!(qto.totals().get(WALL_QTO, "Length"), None);
    }

    #[tokio::test]
    async fn tree_matches_flat_report() {
        let models = Models(vec![two_walls()]);
        let mut qto = QuantityTakeoff::default();
        qto.sum_quantities(&models, &walls_selection()).await.unwrap();

        let flat = qto.flat_report();
        let tree = qto.tree_report();
        assert_eq!(tree.len(), flat.len());
        for row in &tree {
            let quantities = &flat[&row.name];
            assert_eq!(row.children.len(), quantities.len());
            for leaf in &row.children {
                assert_eq!(quantities.get(&leaf.name), Some(&leaf.value));
            }
        }
    }

    #[tokio::test]
    async fn export_round_trips_flat_report() {
        let models = Models(vec![two_walls()]);
        let mut qto = QuantityTakeoff::default();
        qto.sum_quantities(&models, &walls_selection()).await.unwrap();

        let mut sink = MemorySink::default();
        let name = qto.export_to(&mut sink, None).unwrap();

        assert_eq!(name, "quantities.json");
        let parsed: FlatReport = serde_json::from_str(&sink.downloads[0].1).unwrap();
        assert_eq!(parsed, qto.flat_report());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn dispose_clears_the_totals() {
        let models = Models(vec![two_walls()]);
        let mut qto = QuantityTakeoff::default();
        qto.sum_quantities(&models, &walls_selection()).await.unwrap();
        assert_eq!(qto.totals().len(), 1);

        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || qto.dispose());

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("clearing quantity totals"), "{logs}");
        assert!(logs.contains("sets=1"), "{logs}");
        assert!(logs.contains("quantity take-off disposed"), "{logs}");
    }
}
