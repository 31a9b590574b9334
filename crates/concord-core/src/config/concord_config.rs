//! Top-level Concord configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{MiningConfig, OrchestratorConfig, PartitionConfig, ReportConfig, ReportFormat};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;
use crate::model::MetricType;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CONCORD_*`)
/// 3. Config file (`--config <path>` or `concord.toml` in the working directory)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConcordConfig {
    pub partitioning: PartitionConfig,
    pub orchestrator: OrchestratorConfig,
    pub mining: MiningConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub partitions: Option<usize>,
    pub workers: Option<usize>,
    pub poll_interval_ms: Option<u64>,
    pub max_rules: Option<usize>,
    pub metric: Option<MetricType>,
    pub min_metric: Option<f64>,
    /// 1-based, as typed by the user.
    pub class_index: Option<i64>,
    pub output_dir: Option<String>,
    pub format: Option<ReportFormat>,
    pub include_unmatched: Option<bool>,
}

impl ConcordConfig {
    /// Load configuration with layered resolution.
    ///
    /// An explicit `config_path` must exist; the implicit `concord.toml` in
    /// `root` is optional.
    pub fn load(
        root: &Path,
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let project_config_path: PathBuf = root.join(CONFIG_FILE_NAME);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        tracing::debug!(
            partitions = config.partitioning.effective_partitions(),
            workers = config.orchestrator.effective_workers(),
            max_rules = config.mining.effective_max_rules(),
            "configuration resolved"
        );

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ConcordConfig) -> Result<(), ConfigError> {
        if config.partitioning.effective_partitions() == 0 {
            return Err(invalid("partitioning.partitions", "must be at least 1"));
        }
        if config.orchestrator.effective_workers() == 0 {
            return Err(invalid("orchestrator.workers", "must be at least 1"));
        }
        if config.orchestrator.poll_interval_ms == Some(0) {
            return Err(invalid(
                "orchestrator.poll_interval_ms",
                "must be greater than 0",
            ));
        }

        let mining = &config.mining;
        if mining.effective_max_rules() == 0 {
            return Err(invalid("mining.max_rules", "must be at least 1"));
        }
        let min_metric = mining.effective_min_metric();
        if !min_metric.is_finite() || min_metric < 0.0 {
            return Err(invalid("mining.min_metric", "must be a non-negative number"));
        }
        let delta = mining.effective_support_delta();
        if !delta.is_finite() || delta <= 0.0 {
            return Err(invalid("mining.support_delta", "must be greater than 0"));
        }
        let lower = mining.effective_lower_bound();
        let upper = mining.effective_upper_bound();
        for (field, value) in [
            ("mining.lower_bound_min_support", lower),
            ("mining.upper_bound_min_support", upper),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
        }
        if lower > upper {
            return Err(invalid(
                "mining.lower_bound_min_support",
                "must not exceed mining.upper_bound_min_support",
            ));
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut ConcordConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: ConcordConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut ConcordConfig, other: &ConcordConfig) {
        // Partitioning
        if other.partitioning.partitions.is_some() {
            base.partitioning.partitions = other.partitioning.partitions;
        }

        // Orchestrator
        if other.orchestrator.workers.is_some() {
            base.orchestrator.workers = other.orchestrator.workers;
        }
        if other.orchestrator.poll_interval_ms.is_some() {
            base.orchestrator.poll_interval_ms = other.orchestrator.poll_interval_ms;
        }

        // Mining
        if other.mining.max_rules.is_some() {
            base.mining.max_rules = other.mining.max_rules;
        }
        if other.mining.metric.is_some() {
            base.mining.metric = other.mining.metric;
        }
        if other.mining.min_metric.is_some() {
            base.mining.min_metric = other.mining.min_metric;
        }
        if other.mining.support_delta.is_some() {
            base.mining.support_delta = other.mining.support_delta;
        }
        if other.mining.lower_bound_min_support.is_some() {
            base.mining.lower_bound_min_support = other.mining.lower_bound_min_support;
        }
        if other.mining.upper_bound_min_support.is_some() {
            base.mining.upper_bound_min_support = other.mining.upper_bound_min_support;
        }
        if other.mining.class_index.is_some() {
            base.mining.class_index = other.mining.class_index;
        }

        // Report
        if other.report.output_dir.is_some() {
            base.report.output_dir = other.report.output_dir.clone();
        }
        if other.report.matches_file.is_some() {
            base.report.matches_file = other.report.matches_file.clone();
        }
        if other.report.rules_file.is_some() {
            base.report.rules_file = other.report.rules_file.clone();
        }
        if other.report.format.is_some() {
            base.report.format = other.report.format;
        }
        if other.report.include_unmatched.is_some() {
            base.report.include_unmatched = other.report.include_unmatched;
        }
    }

    /// Apply environment variable overrides read through `lookup`.
    /// Pattern: `CONCORD_PARTITIONS`, `CONCORD_WORKERS`, `CONCORD_MAX_RULES`, etc.
    ///
    /// Unlike a config file typo, a non-numeric environment value is a
    /// configuration error: it is rejected before any job is created.
    pub fn apply_env_overrides<F>(config: &mut ConcordConfig, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_env(&lookup, "CONCORD_PARTITIONS")? {
            config.partitioning.partitions = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "CONCORD_WORKERS")? {
            config.orchestrator.workers = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "CONCORD_POLL_INTERVAL_MS")? {
            config.orchestrator.poll_interval_ms = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "CONCORD_MAX_RULES")? {
            config.mining.max_rules = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "CONCORD_METRIC")? {
            config.mining.metric = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "CONCORD_MIN_METRIC")? {
            config.mining.min_metric = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "CONCORD_CLASS_INDEX")? {
            config.mining.class_index = Some(v);
        }
        if let Some(v) = lookup("CONCORD_OUTPUT_DIR") {
            config.report.output_dir = Some(v);
        }
        if let Some(v) = parse_env(&lookup, "CONCORD_REPORT_FORMAT")? {
            config.report.format = Some(v);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(config: &mut ConcordConfig, cli: &CliOverrides) {
        if let Some(v) = cli.partitions {
            config.partitioning.partitions = Some(v);
        }
        if let Some(v) = cli.workers {
            config.orchestrator.workers = Some(v);
        }
        if let Some(v) = cli.poll_interval_ms {
            config.orchestrator.poll_interval_ms = Some(v);
        }
        if let Some(v) = cli.max_rules {
            config.mining.max_rules = Some(v);
        }
        if let Some(v) = cli.metric {
            config.mining.metric = Some(v);
        }
        if let Some(v) = cli.min_metric {
            config.mining.min_metric = Some(v);
        }
        if let Some(v) = cli.class_index {
            config.mining.class_index = Some(v);
        }
        if let Some(ref v) = cli.output_dir {
            config.report.output_dir = Some(v.clone());
        }
        if let Some(v) = cli.format {
            config.report.format = Some(v);
        }
        if let Some(v) = cli.include_unmatched {
            config.report.include_unmatched = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
