use crate::error::ExportError;
use crate::qto::QuantityTotals;
use std::fs::File;
use std::path::Path;

/// Writes one row per summed quantity: set, quantity, value.
pub fn export_csv<P: AsRef<Path>>(totals: &QuantityTotals, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(["Quantity Set", "Quantity", "Value"])?;

    for (set, quantities) in totals.sets() {
        for (name, value) in quantities {
            let value = value.to_string();
            writer.write_record([set.as_str(), name.as_str(), value.as_str()])?;
        }
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}
