//! Mining adapters: the pluggable procedure that turns one partition into rules.

pub mod apriori;

pub use apriori::AprioriMiner;

use concord_core::errors::MiningError;
use concord_core::model::{MinedRun, MiningParameters, Partition};

/// Discovers association rules in a single partition.
///
/// Implementations are invoked concurrently from the worker pool, once per
/// partition, and must not rely on any cross-invocation state. Errors are
/// contained by the orchestrator: the partition simply contributes no run.
pub trait MiningAdapter: Send + Sync {
    /// Short adapter name for logs.
    fn name(&self) -> &str;

    /// Mines `partition` with `params`.
    fn mine(&self, partition: &Partition, params: &MiningParameters)
        -> Result<MinedRun, MiningError>;
}
