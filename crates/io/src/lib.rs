//! `dealproof-io` — file I/O for the reconciliation pipeline.
//!
//! Loads the bill-back and PPM extracts from xlsx workbooks or CSV files,
//! extracts typed records with column validation, enriches them (brand+pack
//! labels, state abbreviations, posting periods), applies the cohort filter,
//! and exports result tables.

pub mod csv;
pub mod enrich;
pub mod error;
pub mod export;
pub mod extract;
pub mod sheet;
pub mod states;
pub mod table;

pub use error::IoError;
pub use table::{Cell, Table};
