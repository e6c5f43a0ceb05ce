//! Error types for studypulse

use thiserror::Error;

/// Errors that can occur during ingest or rollup requests
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to parse sample record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),
}
