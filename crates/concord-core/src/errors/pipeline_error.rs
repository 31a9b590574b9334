//! Batch pipeline errors.

use super::{ConfigError, DatasetError, ReportError, StoreError};

/// Errors that abort a whole batch run.
/// Aggregates subsystem errors via `From` conversions.
///
/// Per-job mining failures never surface here; they are contained by the
/// orchestrator and counted in its batch statistics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Worker pool could not be built: {0}")]
    WorkerPool(String),
}
