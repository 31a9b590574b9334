//! Reporting errors.

/// Errors raised while persisting consensus output.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Failed to serialize report: {0}")]
    Serialization(String),
}
