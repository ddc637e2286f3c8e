//! Quantity take-off: sums `IfcElementQuantity` values over a selection.
//!
//! [`QuantityTakeoff`] owns the running totals. It walks each selected
//! element's `IsDefinedBy` relations through a [`PropertyModel`] and adds
//! every named quantity into [`QuantityTotals`]. The [`report`] functions
//! shape those totals into the flat JSON export and the two-level tree the
//! dashboard renders.

pub mod report;
pub mod source;
pub mod takeoff;
pub mod totals;

pub use report::{QtoTreeLeaf, QtoTreeRow};
pub use source::{ModelResolver, PropertyModel, Relation};
pub use takeoff::{QuantityTakeoff, TakeoffStats};
pub use totals::{FlatReport, QuantityTotals};
