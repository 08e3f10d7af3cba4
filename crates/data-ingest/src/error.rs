//! Ingestion Error Types

use serde::Serialize;
use thiserror::Error;

/// Structural ingestion errors. These abort the run before any
/// classification starts.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A required column could not be identified from the header row
    #[error("required column '{0}' could not be identified in the header row")]
    MissingColumn(&'static str),

    /// Neither a long nor a wide month layout could be detected
    #[error("table layout not recognized: no period/consumption columns and no month-like headers")]
    AmbiguousLayout,

    /// Input has no header row
    #[error("table has no header row")]
    EmptyTable,

    /// Failed to open the input file
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV-level read failure
    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),
}

/// A row-level coercion failure. Collected and reported, never fatal for
/// the dataset: the offending value is excluded and counted.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// 1-based data row number, header excluded
    pub row: usize,
    /// Installation id, when the identifier cell was readable
    pub installation_id: Option<String>,
    /// What went wrong
    pub message: String,
}
