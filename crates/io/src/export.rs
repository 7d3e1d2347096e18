// Result export: the flat 11-column table as CSV, and JSON for machine
// consumers.

use std::path::Path;

use dealproof_engine::model::{MatchOutcome, ReconResult};
use serde_json::{json, Value};

use crate::error::IoError;

/// The output table contract: these columns, in this order.
pub const RESULT_COLUMNS: [&str; 11] = [
    "Material",
    "At price",
    "Case in Part",
    "Part Amount",
    "Extended Part",
    "Net$",
    "Quantity",
    "Unit Rebate$",
    "Rebate",
    "VAR",
    "Comment",
];

/// Render result rows as CSV. Absent numerics are empty fields, never 0;
/// a perfect match has an empty comment.
pub fn results_csv_string(rows: &[MatchOutcome]) -> Result<String, IoError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(RESULT_COLUMNS)
        .map_err(|e| IoError::Csv(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.material_id.clone(),
                opt_field(row.at_price),
                opt_field(row.case_in_part),
                opt_field(row.part_amount),
                opt_field(row.extended_part),
                opt_field(row.net_price),
                opt_field(row.quantity),
                opt_field(row.unit_rebate),
                opt_field(row.rebate),
                row.variance.to_string(),
                row.comment().unwrap_or_default(),
            ])
            .map_err(|e| IoError::Csv(e.to_string()))?;
    }

    let bytes = writer.into_inner().map_err(|e| IoError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| IoError::Csv(e.to_string()))
}

pub fn write_results_csv(path: &Path, rows: &[MatchOutcome]) -> Result<(), IoError> {
    let content = results_csv_string(rows)?;
    std::fs::write(path, content).map_err(|e| IoError::Export {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn opt_field(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// One result row as a JSON object keyed by the output captions.
pub fn row_json(row: &MatchOutcome) -> Value {
    json!({
        "Material": &row.material_id,
        "At price": row.at_price,
        "Case in Part": row.case_in_part,
        "Part Amount": row.part_amount,
        "Extended Part": row.extended_part,
        "Net$": row.net_price,
        "Quantity": row.quantity,
        "Unit Rebate$": row.unit_rebate,
        "Rebate": row.rebate,
        "VAR": row.variance,
        "Comment": row.comment(),
    })
}

/// The full run result: meta, summary, flat rows, and group warnings.
pub fn result_json(result: &ReconResult) -> Value {
    json!({
        "meta": &result.meta,
        "summary": &result.summary,
        "rows": result.rows.iter().map(row_json).collect::<Vec<_>>(),
        "warnings": &result.warnings,
    })
}

pub fn write_result_json(path: &Path, result: &ReconResult) -> Result<(), IoError> {
    let content = serde_json::to_string_pretty(&result_json(result))
        .map_err(|e| IoError::Export {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    std::fs::write(path, content).map_err(|e| IoError::Export {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
