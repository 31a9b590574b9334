//! Compiled defaults shared by config resolution and the engine.

/// Number of partitions the dataset is split into.
pub const DEFAULT_PARTITIONS: usize = 2;

/// Maximum concurrent mining jobs.
pub const DEFAULT_WORKERS: usize = 8;

/// Liveness interval while the orchestrator waits on outstanding jobs.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

/// Rule cap per mining run.
pub const DEFAULT_MAX_RULES: usize = 10;

/// Minimum value of the selected rule metric.
pub const DEFAULT_MIN_METRIC: f64 = 0.6;

/// Step by which minimum support is lowered between Apriori cycles.
pub const DEFAULT_SUPPORT_DELTA: f64 = 0.001;

/// Lowest minimum support the miner will try.
pub const DEFAULT_LOWER_BOUND_MIN_SUPPORT: f64 = 0.001;

/// Minimum support of the first Apriori cycle.
pub const DEFAULT_UPPER_BOUND_MIN_SUPPORT: f64 = 0.1;

/// Ranked-matches destination file name.
pub const DEFAULT_MATCHES_FILE: &str = "rulematches";

/// Raw run-summary destination file name.
pub const DEFAULT_RULES_FILE: &str = "rules";

/// Project-level config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "concord.toml";

/// Environment variable holding the tracing filter directives.
pub const LOG_ENV_VAR: &str = "CONCORD_LOG";

/// Separator between the rendered antecedent and consequent of a rule key.
pub const RULE_SEPARATOR: &str = " ==>  ";
