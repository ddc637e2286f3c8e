use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{ParseError, QtoError};
use crate::model::{ElementId, ElementSummary, ModelId, PropertyRecord, QuantityMeasure, RecordKind};
use crate::parser::step::{StepEntity, StepFile};
use crate::qto::{PropertyModel, Relation};

// IfcRelDefinesByProperties: RelatedObjects, RelatingPropertyDefinition
const REL_RELATED_OBJECTS: usize = 4;
const REL_RELATING_DEFINITION: usize = 5;
// IfcElementQuantity: Quantities
const QSET_QUANTITIES: usize = 5;
// IfcPhysicalSimpleQuantity subtypes: Name, Description, Unit, <Measure>Value
const QUANTITY_NAME: usize = 0;
const QUANTITY_VALUE: usize = 3;
// IfcRoot: Name
const ROOT_NAME: usize = 2;

/// One IFC file loaded as a queryable property graph.
///
/// Records are typed on lookup from the parsed STEP entities; the
/// `IsDefinedBy` index is built once at load time.
#[derive(Debug)]
pub struct StepModel {
    id: ModelId,
    project_name: String,
    step: StepFile,
    defined_by: HashMap<ElementId, Vec<ElementId>>,
    elements: Vec<ElementSummary>,
}

/// Parses an IFC file into a [`StepModel`].
///
/// The model id is the file stem, so `level-2.ifc` loads as `level-2`.
///
/// # Errors
///
/// Returns [`ParseError::FileRead`] if the file cannot be read.
/// Returns [`ParseError::InvalidStep`] if the STEP format is malformed.
///
/// # Example
///
/// ```no_run
/// use ifc_qto::parser::parse_ifc_file;
///
/// let model = parse_ifc_file("model.ifc")?;
/// println!("{}: {} elements", model.project_name(), model.elements().len());
/// # Ok::<(), ifc_qto::error::ParseError>(())
/// ```
pub fn parse_ifc_file<P: AsRef<Path>>(path: P) -> Result<StepModel, ParseError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let step_file = StepFile::parse(&content)?;
    let id = path
        .file_stem()
        .map_or_else(|| "model".to_string(), |s| s.to_string_lossy().to_string());

    Ok(StepModel::from_step(ModelId::new(id), step_file))
}

impl StepModel {
    #[must_use]
    pub fn from_step(id: ModelId, step: StepFile) -> Self {
        let project_name = extract_project_name(&step);
        let defined_by = extract_defined_by(&step);

        let mut elements: Vec<ElementSummary> = defined_by
            .keys()
            .filter_map(|&element| step.get_entity(element))
            .map(|entity| ElementSummary {
                model: id.clone(),
                id: entity.id,
                entity_type: entity.entity_type.clone(),
                name: entity.string_at(ROOT_NAME).map(str::to_string),
            })
            .collect();
        elements.sort_by(|a, b| a.entity_type.cmp(&b.entity_type).then(a.id.cmp(&b.id)));

        debug!(
            model = %id,
            schema = %step.schema,
            entities = step.entities.len(),
            elements = elements.len(),
            "IFC model indexed"
        );

        Self {
            id,
            project_name,
            step,
            defined_by,
            elements,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ModelId {
        &self.id
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.step.schema
    }

    /// Elements carrying at least one property definition, by entity type then id.
    #[must_use]
    pub fn elements(&self) -> &[ElementSummary] {
        &self.elements
    }

    /// Types the entity behind `id`, `None` if the id is unknown.
    #[must_use]
    pub fn record(&self, id: ElementId) -> Option<PropertyRecord> {
        self.step.get_entity(id).map(classify)
    }
}

#[async_trait]
impl PropertyModel for StepModel {
    fn model_id(&self) -> &ModelId {
        &self.id
    }

    fn has_property_data(&self) -> bool {
        !self.defined_by.is_empty()
    }

    async fn get_properties(&self, id: ElementId) -> Result<Option<PropertyRecord>, QtoError> {
        Ok(self.record(id))
    }

    fn relations(&self, element: ElementId, relation: Relation) -> Option<Vec<ElementId>> {
        match relation {
            Relation::IsDefinedBy => self.defined_by.get(&element).cloned(),
        }
    }
}

fn classify(entity: &StepEntity) -> PropertyRecord {
    if let Some(measure) = QuantityMeasure::from_entity_type(&entity.entity_type) {
        let value = match measure {
            QuantityMeasure::Complex => None,
            _ => entity
                .values
                .get(QUANTITY_VALUE)
                .and_then(crate::parser::StepValue::as_number),
        };
        return PropertyRecord {
            id: entity.id,
            name: entity.string_at(QUANTITY_NAME).map(str::to_string),
            kind: RecordKind::Quantity { measure, value },
        };
    }

    let kind = match entity.entity_type.as_str() {
        "IFCELEMENTQUANTITY" => RecordKind::ElementQuantitySet {
            quantities: entity.references_at(QSET_QUANTITIES),
        },
        "IFCPROPERTYSET" => RecordKind::PropertySet,
        other => RecordKind::Other {
            entity_type: other.to_string(),
        },
    };

    PropertyRecord {
        id: entity.id,
        name: entity.string_at(ROOT_NAME).map(str::to_string),
        kind,
    }
}

fn extract_project_name(step_file: &StepFile) -> String {
    step_file
        .get_entities_by_type("IFCPROJECT")
        .first()
        .and_then(|e| e.string_at(ROOT_NAME))
        .map_or_else(|| "Unknown Project".to_string(), str::to_string)
}

/// Element → property definitions, from IFCRELDEFINESBYPROPERTIES.
fn extract_defined_by(step_file: &StepFile) -> HashMap<ElementId, Vec<ElementId>> {
    let mut defined_by: HashMap<ElementId, Vec<ElementId>> = HashMap::new();

    for rel in step_file.get_entities_by_type("IFCRELDEFINESBYPROPERTIES") {
        // IFC4 allows a set of definitions here, IFC2X3 a single reference.
        let definitions = rel.references_at(REL_RELATING_DEFINITION);
        if definitions.is_empty() {
            continue;
        }
        for element in rel.references_at(REL_RELATED_OBJECTS) {
            defined_by
                .entry(element)
                .or_default()
                .extend(definitions.iter().copied());
        }
    }

    defined_by
}
