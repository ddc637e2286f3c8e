use crate::error::ExportError;
use crate::qto::{report, QuantityTotals};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the flat report as pretty JSON to `path`.
pub fn export_json<P: AsRef<Path>>(totals: &QuantityTotals, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let json = report::to_json(totals)?;

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}
