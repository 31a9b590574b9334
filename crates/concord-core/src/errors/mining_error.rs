//! Mining adapter errors.

/// Errors a mining adapter can report for a single partition.
///
/// The orchestrator treats these opaquely: the job is logged as failed and
/// contributes nothing to the result store.
#[derive(Debug, thiserror::Error)]
pub enum MiningError {
    #[error("Partition {partition} has no rows to mine")]
    EmptyPartition { partition: usize },

    #[error("Invalid mining parameter {field}: {message}")]
    InvalidParameter { field: String, message: String },

    #[error("Class attribute index {index} is outside the schema ({attributes} attributes)")]
    ClassIndexOutOfRange { index: usize, attributes: usize },

    #[error("Mining adapter {adapter} failed: {message}")]
    AdapterFailed { adapter: String, message: String },
}
