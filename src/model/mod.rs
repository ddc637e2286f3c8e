pub mod element;
pub mod record;
pub mod selection;

pub use element::ElementSummary;
pub use record::{PropertyRecord, QuantityMeasure, RecordKind};
pub use selection::{ElementId, FragmentId, ModelId, Selection};
