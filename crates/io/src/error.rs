use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File read failure.
    FileRead { path: String, message: String },
    /// Named sheet absent from the workbook.
    SheetNotFound { file: String, sheet: String },
    /// Workbook open / range read failure.
    Workbook { path: String, message: String },
    /// CSV parse failure.
    Csv(String),
    /// Required column absent from an input table; matching cannot proceed.
    MissingColumn { table: String, column: String },
    /// Export write failure.
    Export { path: String, message: String },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileRead { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::SheetNotFound { file, sheet } => {
                write!(f, "{file}: sheet '{sheet}' not found")
            }
            Self::Workbook { path, message } => write!(f, "cannot open {path}: {message}"),
            Self::Csv(msg) => write!(f, "CSV parse error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "{table}: missing column '{column}'")
            }
            Self::Export { path, message } => write!(f, "cannot write {path}: {message}"),
        }
    }
}

impl std::error::Error for IoError {}
