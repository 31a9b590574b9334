//! # concord-cli
//!
//! Command-line entry point for Concord.
//!
//! ```text
//! concord <dataset.arff> [partitions] [rules_per_partition] [class_index]
//! ```
//!
//! The class index is 1-based; `0`, a negative value, or leaving it out mines
//! plain association rules. Every positional and flag overrides `concord.toml`
//! and the `CONCORD_*` environment variables.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use concord_core::config::{CliOverrides, ConcordConfig, ReportFormat};
use concord_core::model::MetricType;
use concord_engine::dataset::load_arff;
use concord_engine::{run_batch, AprioriMiner, BatchOutcome, FileReporter};

/// Mine each partition of a dataset independently and rank the rules the
/// partitions agree on.
#[derive(Debug, Parser)]
#[command(name = "concord")]
#[command(author, version, about, long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Nominal ARFF dataset to mine.
    pub dataset: PathBuf,

    /// Number of contiguous partitions (default 2).
    pub partitions: Option<usize>,

    /// Rules mined per partition (default 10).
    pub rules_per_partition: Option<usize>,

    /// 1-based class attribute index; 0 or negative disables class mode.
    pub class_index: Option<i64>,

    /// Worker threads (default 8).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Progress log interval while waiting for jobs, in milliseconds.
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Rule quality metric: confidence or lift.
    #[arg(long)]
    pub metric: Option<MetricType>,

    /// Minimum metric value for a rule to be kept.
    #[arg(long)]
    pub min_metric: Option<f64>,

    /// Directory for the `rulematches` and `rules` files.
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Layout of the ranked matches: text or json.
    #[arg(long)]
    pub format: Option<ReportFormat>,

    /// Also report rules no other run agreed with, with 0 votes.
    #[arg(long)]
    pub include_unmatched: bool,

    /// Configuration file; defaults to `concord.toml` in the working directory.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Overrides carried by this invocation.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            partitions: self.partitions,
            workers: self.workers,
            poll_interval_ms: self.poll_interval_ms,
            max_rules: self.rules_per_partition,
            metric: self.metric,
            min_metric: self.min_metric,
            class_index: self.class_index,
            output_dir: self.output_dir.clone(),
            format: self.format,
            include_unmatched: self.include_unmatched.then_some(true),
        }
    }
}

/// Resolves configuration relative to `root`, loads the dataset, and runs one
/// batch with the Apriori miner and file reporter.
///
/// # Errors
///
/// Fails on bad configuration, an unreadable dataset, or a report that cannot
/// be written. Individual mining job failures do not fail the run.
pub fn execute(cli: &Cli, root: &Path) -> Result<BatchOutcome> {
    let config = ConcordConfig::load(root, cli.config.as_deref(), Some(&cli.overrides()))
        .context("Failed to resolve configuration")?;

    let dataset = load_arff(&cli.dataset)
        .with_context(|| format!("Failed to load dataset {}", cli.dataset.display()))?;

    let reporter = FileReporter::from_config(&config.report);
    let outcome = run_batch(&dataset, &config, Arc::new(AprioriMiner::new()), &reporter)?;

    info!(
        matches = %reporter.matches_path().display(),
        rules = %reporter.rules_path().display(),
        "results written"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positionals_map_to_overrides() {
        let cli = Cli::parse_from(["concord", "data.arff", "4", "20", "3"]);
        assert_eq!(cli.dataset, PathBuf::from("data.arff"));

        let overrides = cli.overrides();
        assert_eq!(overrides.partitions, Some(4));
        assert_eq!(overrides.max_rules, Some(20));
        assert_eq!(overrides.class_index, Some(3));
        assert_eq!(overrides.include_unmatched, None);
    }

    #[test]
    fn negative_class_index_is_accepted() {
        let cli = Cli::parse_from(["concord", "data.arff", "2", "10", "-1"]);
        assert_eq!(cli.class_index, Some(-1));
    }

    #[test]
    fn flags_map_to_overrides() {
        let cli = Cli::parse_from([
            "concord",
            "data.arff",
            "--workers",
            "3",
            "--poll-interval-ms",
            "250",
            "--metric",
            "lift",
            "--min-metric",
            "1.2",
            "--output-dir",
            "out",
            "--format",
            "json",
            "--include-unmatched",
        ]);

        let overrides = cli.overrides();
        assert_eq!(overrides.partitions, None);
        assert_eq!(overrides.workers, Some(3));
        assert_eq!(overrides.poll_interval_ms, Some(250));
        assert_eq!(overrides.metric, Some(MetricType::Lift));
        assert_eq!(overrides.min_metric, Some(1.2));
        assert_eq!(overrides.output_dir.as_deref(), Some("out"));
        assert_eq!(overrides.format, Some(ReportFormat::Json));
        assert_eq!(overrides.include_unmatched, Some(true));
    }

    #[test]
    fn dataset_is_required() {
        assert!(Cli::try_parse_from(["concord"]).is_err());
    }

    #[test]
    fn missing_dataset_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from(["concord", "does-not-exist.arff"]);
        let err = execute(&cli, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to load dataset"));
    }

    #[test]
    fn execute_writes_reports_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("shapes.arff");
        let mut text = String::from(
            "@relation shapes\n@attribute color {red,blue}\n@attribute size {small,large}\n@data\n",
        );
        for _ in 0..2 {
            text.push_str(&"red,large\n".repeat(6));
            text.push_str(&"blue,small\n".repeat(4));
        }
        std::fs::write(&data, text).unwrap();

        let out = dir.path().join("out");
        let cli = Cli::parse_from([
            "concord".to_string(),
            data.display().to_string(),
            "2".to_string(),
            "5".to_string(),
            "--output-dir".to_string(),
            out.display().to_string(),
            "--poll-interval-ms".to_string(),
            "10".to_string(),
        ]);
        let outcome = execute(&cli, dir.path()).unwrap();

        assert_eq!(outcome.stats.succeeded, 2);
        assert!(outcome
            .entries
            .iter()
            .any(|e| e.rule == "color=red  ==>  size=large " && e.votes == 1));
        let matches = std::fs::read_to_string(out.join("rulematches")).unwrap();
        assert!(matches.contains("1: color=red  ==>  size=large "));
        assert!(out.join("rules").exists());
    }
}
