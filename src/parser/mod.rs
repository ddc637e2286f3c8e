pub mod ifc;
pub mod registry;
pub mod step;

pub use crate::error::ParseError;
pub use ifc::{parse_ifc_file, StepModel};
pub use registry::ModelRegistry;
pub use step::{StepEntity, StepFile, StepValue};
