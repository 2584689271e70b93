//! Snapshot loading errors.
//!
//! Only the file/JSON boundary can fail. Normalization, relationship
//! resolution and filtering degrade to empty results instead.

use thiserror::Error;

/// Errors raised while reading snapshot input.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Input file could not be read.
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not syntactically valid JSON.
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}
