use super::ElementId;
use serde::Serialize;

/// Measure carried by an `IfcPhysicalQuantity` subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuantityMeasure {
    Length,
    Area,
    Volume,
    Count,
    Weight,
    Time,
    /// `IfcPhysicalComplexQuantity` - groups other quantities, has no value of its own.
    Complex,
}

impl QuantityMeasure {
    /// Maps an IFC entity name to its measure, `None` for non-quantity entities.
    #[must_use]
    pub fn from_entity_type(entity_type: &str) -> Option<Self> {
        match entity_type {
            "IFCQUANTITYLENGTH" => Some(Self::Length),
            "IFCQUANTITYAREA" => Some(Self::Area),
            "IFCQUANTITYVOLUME" => Some(Self::Volume),
            "IFCQUANTITYCOUNT" => Some(Self::Count),
            "IFCQUANTITYWEIGHT" => Some(Self::Weight),
            "IFCQUANTITYTIME" => Some(Self::Time),
            "IFCPHYSICALCOMPLEXQUANTITY" => Some(Self::Complex),
            _ => None,
        }
    }
}

/// Discriminant of a property record, resolved once when the record is looked up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RecordKind {
    /// `IfcElementQuantity` with the ids of its child quantities.
    ElementQuantitySet { quantities: Vec<ElementId> },
    /// A single named measurement.
    Quantity {
        measure: QuantityMeasure,
        value: Option<f64>,
    },
    /// `IfcPropertySet` - never contributes to a take-off.
    PropertySet,
    Other { entity_type: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub id: ElementId,
    pub name: Option<String>,
    pub kind: RecordKind,
}

impl PropertyRecord {
    #[must_use]
    pub fn is_element_quantity_set(&self) -> bool {
        matches!(self.kind, RecordKind::ElementQuantitySet { .. })
    }

    /// Child quantity ids of a quantity set; empty for every other kind.
    #[must_use]
    pub fn quantity_ids(&self) -> &[ElementId] {
        match &self.kind {
            RecordKind::ElementQuantitySet { quantities } => quantities,
            _ => &[],
        }
    }

    /// Numeric value of a quantity; `None` for every other kind.
    #[must_use]
    pub fn quantity_value(&self) -> Option<f64> {
        match &self.kind {
            RecordKind::Quantity { value, .. } => *value,
            _ => None,
        }
    }
}
