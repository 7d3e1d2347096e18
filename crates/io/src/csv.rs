// CSV import. Distributor exports are frequently Windows-1252, so decoding
// falls back from UTF-8 rather than failing.

use std::io::Read;
use std::path::Path;

use crate::error::IoError;
use crate::table::{Cell, Table};

pub fn load_csv(path: &Path) -> Result<Table, IoError> {
    let content = read_file_as_utf8(path)?;
    table_from_str(&content)
}

/// Read file bytes and convert to UTF-8 if needed (Windows-1252, Latin-1).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path).map_err(|e| IoError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| IoError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
            Ok(decoded.into_owned())
        }
    }
}

/// Parse CSV text into a [`Table`]. The first record is the header row;
/// every data cell is text; numeric coercion happens during extraction.
pub fn table_from_str(content: &str) -> Result<Table, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(|e| IoError::Csv(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| IoError::Csv(e.to_string()))?;
        rows.push(
            record
                .iter()
                .map(|s| {
                    if s.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(s.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(Table { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_basic_csv() {
        let table = table_from_str("Material,Net$\n100,5.0\n200,\n").unwrap();
        assert_eq!(table.headers, vec!["Material", "Net$"]);
        assert_eq!(table.len(), 2);
        assert_eq!(*table.cell(0, 1), Cell::Text("5.0".into()));
        assert_eq!(*table.cell(1, 1), Cell::Empty);
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let table = table_from_str("A,B,C\n1,2\n1,2,3,4\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(*table.cell(0, 2), Cell::Empty);
    }

    #[test]
    fn windows_1252_fallback() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        // "Muñoz" in Windows-1252: 0xF1 for ñ is invalid UTF-8.
        f.write_all(b"Dist Name\nMu\xF1oz Dist\n").unwrap();
        let table = load_csv(f.path()).unwrap();
        assert_eq!(*table.cell(0, 0), Cell::Text("Muñoz Dist".into()));
    }
}
