pub mod csv;
pub mod json;
pub mod sink;

pub use crate::error::ExportError;
pub use csv::export_csv;
pub use json::export_json;
pub use sink::{DirectorySink, DownloadSink, MemorySink};
