//! # Sanity Index Dataset Crate
//!
//! The file adapter around the scoring engine. It reads long-format
//! observation CSVs into `Observation`s and writes the two score tables the
//! dashboard consumes.
//!
//! ## Public API
//!
//! - `read_observations`: parse `series_id,date,value` rows, skipping bad rows with a report.
//! - `write_report`: write `mom_scores.csv` and `section_scores.csv` into a directory.
//! - `DatasetError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod ingest;
pub mod export;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use export::{
    write_headline, write_report, write_sections, ReportFiles, HEADLINE_FILE, SECTIONS_FILE,
};
pub use ingest::{read_observations, read_observations_from, IngestedObservations, RowError};
