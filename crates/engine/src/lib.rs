//! `dealproof-engine` — Bill-back vs deal reconciliation engine.
//!
//! Pure engine crate: receives pre-filtered claim and deal records,
//! returns classified results. No file I/O dependencies.

pub mod assemble;
pub mod cohort;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod scorer;
pub mod summary;

pub use config::ReconConfig;
pub use engine::run;
pub use error::EngineError;
pub use model::{ClaimRecord, Classification, DealRecord, MatchOutcome, ReconResult};
