//! Worker pool configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WORKERS};

/// Bounded worker pool settings, independent of the partition count.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum concurrent mining jobs. Default: 8.
    pub workers: Option<usize>,
    /// Liveness log interval while waiting for jobs, in ms. Default: 5000.
    pub poll_interval_ms: Option<u64>,
}

impl OrchestratorConfig {
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS)
    }

    pub fn effective_poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
    }
}
