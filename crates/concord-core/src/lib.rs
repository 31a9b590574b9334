//! # concord-core
//!
//! Foundation crate for Concord.
//! Defines the data model, errors, configuration, constants, and tracing setup
//! shared by the engine and the CLI.

pub mod config;
pub mod constants;
pub mod errors;
pub mod model;
pub mod tracing;

// Re-export the most commonly used types at the crate root.
pub use config::ConcordConfig;
pub use errors::{ConfigError, DatasetError, MiningError, PipelineError, ReportError, StoreError};
pub use model::{
    Attribute, ConsensusEntry, Dataset, Itemset, MetricType, MinedRun, MiningParameters,
    Partition, Row, Rule, RunResult, Schema,
};
