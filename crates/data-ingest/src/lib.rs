//! Data Ingestion and Normalization
//!
//! Turns raw tabular consumption exports into the normalized dataset the
//! classification engine consumes: column identification, long/wide layout
//! detection, type coercion with row-level error collection, and
//! deduplication.

mod error;
mod ingest;
mod schema;
mod table;

pub use error::{IngestError, RowError};
pub use ingest::{ingest, IngestReport};
pub use schema::TableLayout;
pub use table::RawTable;
