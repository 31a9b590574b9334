//! Configuration system for Concord.
//! TOML-based, layered resolution: CLI > env > config file > defaults.

pub mod concord_config;
pub mod mining_config;
pub mod orchestrator_config;
pub mod partition_config;
pub mod report_config;

pub use concord_config::{CliOverrides, ConcordConfig};
pub use mining_config::MiningConfig;
pub use orchestrator_config::OrchestratorConfig;
pub use partition_config::PartitionConfig;
pub use report_config::{ReportConfig, ReportFormat};
