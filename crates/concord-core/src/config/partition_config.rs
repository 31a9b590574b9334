//! Partitioning configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PARTITIONS;

/// How the dataset is split before mining.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PartitionConfig {
    /// Number of contiguous partitions. Default: 2.
    pub partitions: Option<usize>,
}

impl PartitionConfig {
    /// Returns the effective partition count, defaulting to 2.
    pub fn effective_partitions(&self) -> usize {
        self.partitions.unwrap_or(DEFAULT_PARTITIONS)
    }
}
