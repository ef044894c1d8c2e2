use std::path::PathBuf;
use thiserror::Error;

use crate::model::{DataKind, ElementType};
use crate::sanity::ValidationReport;

/// The main error type for openlabel operations.
///
/// Every variant here is an input or I/O problem reported before the
/// document is touched. Referencing an element that does not exist is not an
/// error: the store logs a warning and returns `None` instead.
#[derive(Debug, Error)]
pub enum VcdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse document JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write document JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid frame interval: {0}")]
    InvalidFrameInterval(String),

    #[error("Invalid UID: {0}")]
    InvalidUid(String),

    #[error("Invalid {kind} data: {message}")]
    InvalidData { kind: DataKind, message: String },

    #[error("Unknown coordinate system '{0}' (declare it with add_coordinate_system first)")]
    UnknownCoordinateSystem(String),

    #[error("Elements of type {0} cannot have frame intervals")]
    StaticOnly(ElementType),

    #[error("Chain code error: {0}")]
    ChainCode(String),

    #[error("Sanity check failed with {error_count} error(s) and {warning_count} warning(s)")]
    SanityFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Document does not comply with the schema ({} message(s))", messages.len())]
    SchemaViolation { messages: Vec<String> },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
