// Workbook import (xlsx, xls, xlsb, ods) via calamine.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::IoError;
use crate::table::{Cell, Table};

/// Load one sheet of a workbook as a [`Table`]. The first row becomes the
/// header row; `sheet = None` selects the first sheet.
pub fn load_sheet(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Workbook {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IoError::Workbook {
                path: path.display().to_string(),
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|_| IoError::SheetNotFound {
            file: path.display().to_string(),
            sheet: sheet_name.clone(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => Vec::new(),
    };

    let rows = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(Table { headers, rows })
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
