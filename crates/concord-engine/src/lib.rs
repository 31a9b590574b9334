//! # concord-engine
//!
//! Partitioned association-rule mining with cross-partition consensus.
//!
//! A dataset is split into contiguous partitions, each partition is mined by a
//! [`MiningAdapter`] on a bounded worker pool, the results are collected in a
//! [`ResultStore`], and rules that independently recur across runs are ranked
//! by the number of agreeing run pairs.

pub mod consensus;
pub mod dataset;
pub mod mining;
pub mod orchestrator;
pub mod partition;
pub mod pipeline;
pub mod report;
pub mod store;

pub use consensus::{canonicalize, match_rules, rule_key, ConsensusOptions, Side};
pub use mining::{AprioriMiner, MiningAdapter};
pub use orchestrator::{BatchStats, JobOutcome, Orchestrator};
pub use partition::partition;
pub use pipeline::{run_batch, BatchOutcome};
pub use report::{FileReporter, Reporter};
pub use store::ResultStore;
