//! Read-only views over [`QuantityTotals`].

use serde::{Deserialize, Serialize};

use super::totals::{FlatReport, QuantityTotals};
use crate::error::ExportError;
use crate::export::DownloadSink;

/// Base name of the JSON export when none is given.
pub const DEFAULT_EXPORT_NAME: &str = "quantities";

/// Top-level table row: one quantity set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtoTreeRow {
    pub name: String,
    pub children: Vec<QtoTreeLeaf>,
}

/// Child row: one summed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtoTreeLeaf {
    pub name: String,
    pub value: f64,
}

/// Detached copy of the totals; mutating it never touches the take-off.
#[must_use]
pub fn flat_report(totals: &QuantityTotals) -> FlatReport {
    totals.as_map().clone()
}

/// One row per quantity set, each with its quantities as children.
#[must_use]
pub fn tree_report(totals: &QuantityTotals) -> Vec<QtoTreeRow> {
    totals
        .sets()
        .map(|(set, quantities)| QtoTreeRow {
            name: set.clone(),
            children: quantities
                .iter()
                .map(|(name, value)| QtoTreeLeaf {
                    name: name.clone(),
                    value: *value,
                })
                .collect(),
        })
        .collect()
}

/// Pretty-printed JSON with 2-space indentation.
pub fn to_json(totals: &QuantityTotals) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(totals)?)
}

/// `<name>.json`, defaulting the base name to [`DEFAULT_EXPORT_NAME`].
#[must_use]
pub fn export_file_name(file_name: Option<&str>) -> String {
    let base = file_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_EXPORT_NAME);
    if base.to_ascii_lowercase().ends_with(".json") {
        base.to_string()
    } else {
        format!("{base}.json")
    }
}

/// Serializes the flat report and hands it to `sink`; returns the file name used.
pub fn export_to_file(
    totals: &QuantityTotals,
    sink: &mut dyn DownloadSink,
    file_name: Option<&str>,
) -> Result<String, ExportError> {
    let json = to_json(totals)?;
    let name = export_file_name(file_name);
    sink.download(&json, &name)?;
    Ok(name)
}
