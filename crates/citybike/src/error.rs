//! Error types for the CityBike library.
//!
//! Only fatal conditions live here. Row-level problems (bad dates, broken
//! references, duplicates) are recorded as [`RejectReason`](crate::cleaning::RejectReason)
//! values in the reject log and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::EntityKind;

/// Main error type for CityBike operations.
#[derive(Debug, Error)]
pub enum CityBikeError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A source stream lacks columns every row needs.
    #[error("Schema error in {entity} stream: missing required column(s) {}", missing.join(", "))]
    Schema {
        entity: EntityKind,
        missing: Vec<String>,
    },

    /// A statistic was requested over no data.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CityBike operations.
pub type Result<T> = std::result::Result<T, CityBikeError>;
