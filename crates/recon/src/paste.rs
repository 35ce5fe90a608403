//! Pasted-sheet parsing.
//!
//! The front end hands over raw clipboard text (tab-separated, with a
//! header row); file ingestion stays upstream. Parsing is header-mapped so
//! sources with different column titles keep working.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::error::ReconError;

/// Header names of the pasted sheet's columns. Optional columns produce
/// empty fields when absent from the paste.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub tag: String,
    pub description: String,
    pub unit: String,
    pub location: String,
    pub condition: String,
    pub asset_type: Option<String>,
    pub supplier: Option<String>,
    pub invoice: Option<String>,
    pub origin: Option<String>,
    pub quantity: Option<String>,
    pub note: Option<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            tag: "tag".into(),
            description: "description".into(),
            unit: "unit".into(),
            location: "location".into(),
            condition: "condition".into(),
            asset_type: Some("type".into()),
            supplier: Some("supplier".into()),
            invoice: Some("invoice".into()),
            origin: Some("origin".into()),
            quantity: Some("quantity".into()),
            note: Some("note".into()),
        }
    }
}

/// One parsed row of the pasted sheet, in paste order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PastedRow {
    /// 1-based line in the pasted text, for operator display.
    pub line: usize,
    pub tag: String,
    pub description: String,
    pub asset_type: String,
    pub unit: String,
    pub location: String,
    pub condition: String,
    pub supplier: String,
    pub invoice: String,
    pub origin: String,
    pub quantity: u32,
    pub note: String,
}

/// Parse pasted tab-separated text into rows.
///
/// Headers match case-insensitively after trimming. Entirely blank rows
/// are skipped; a missing or malformed quantity reads as 1.
pub fn load_pasted_rows(text: &str, columns: &ColumnMap) -> Result<Vec<PastedRow>, ReconError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Paste(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        let wanted = name.trim().to_lowercase();
        headers
            .iter()
            .position(|h| *h == wanted)
            .ok_or_else(|| ReconError::MissingColumn {
                column: name.to_string(),
            })
    };
    let opt_idx = |name: &Option<String>| -> Option<usize> {
        let wanted = name.as_ref()?.trim().to_lowercase();
        headers.iter().position(|h| *h == wanted)
    };

    let tag_idx = idx(&columns.tag)?;
    let description_idx = idx(&columns.description)?;
    let unit_idx = idx(&columns.unit)?;
    let location_idx = idx(&columns.location)?;
    let condition_idx = idx(&columns.condition)?;
    let asset_type_idx = opt_idx(&columns.asset_type);
    let supplier_idx = opt_idx(&columns.supplier);
    let invoice_idx = opt_idx(&columns.invoice);
    let origin_idx = opt_idx(&columns.origin);
    let quantity_idx = opt_idx(&columns.quantity);
    let note_idx = opt_idx(&columns.note);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ReconError::Paste(e.to_string()))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        let opt_field = |idx: Option<usize>| idx.map(field).unwrap_or_default();
        let quantity = quantity_idx
            .and_then(|qi| record.get(qi))
            .and_then(|q| q.trim().parse::<u32>().ok())
            .unwrap_or(1);

        rows.push(PastedRow {
            line: i + 2, // 1-based, after the header row
            tag: field(tag_idx),
            description: field(description_idx),
            asset_type: opt_field(asset_type_idx),
            unit: field(unit_idx),
            location: field(location_idx),
            condition: field(condition_idx),
            supplier: opt_field(supplier_idx),
            invoice: opt_field(invoice_idx),
            origin: opt_field(origin_idx),
            quantity,
            note: opt_field(note_idx),
        });
    }
    Ok(rows)
}
