//! # IFC QTO
//!
//! Quantity take-off over IFC building models.
//!
//! ## Features
//!
//! - Load IFC files (IFC2x3 and IFC4 schemas) as queryable property graphs
//! - Sum `IfcElementQuantity` values over a selection of elements
//! - Shape the totals as a flat map or a set → quantity tree
//! - Export to JSON and CSV, or browse in a terminal dashboard
//!
//! ## Example
//!
//! ```no_run
//! use ifc_qto::model::{FragmentId, Selection};
//! use ifc_qto::parser::ModelRegistry;
//! use ifc_qto::qto::QuantityTakeoff;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ModelRegistry::load(["model.ifc"])?;
//! let mut selection = Selection::new();
//! for element in registry.elements() {
//!     selection.insert(element.model.clone(), FragmentId::new(&element.entity_type), element.id);
//! }
//!
//! let mut takeoff = QuantityTakeoff::default();
//! takeoff.aggregate_selection(&registry, &selection).await?;
//! for row in takeoff.tree_report() {
//!     println!("{}: {} quantities", row.name, row.children.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod qto;
pub mod ui;
