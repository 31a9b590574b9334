//! Error handling for Concord.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod dataset_error;
pub mod mining_error;
pub mod pipeline_error;
pub mod report_error;
pub mod store_error;

pub use config_error::ConfigError;
pub use dataset_error::DatasetError;
pub use mining_error::MiningError;
pub use pipeline_error::PipelineError;
pub use report_error::ReportError;
pub use store_error::StoreError;
