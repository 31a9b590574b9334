//! End-to-end batch: partition, mine, collect, match, report.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use concord_core::config::ConcordConfig;
use concord_core::errors::{ConfigError, PipelineError, StoreError};
use concord_core::model::{ConsensusEntry, Dataset};

use crate::consensus::{match_rules, ConsensusOptions};
use crate::mining::MiningAdapter;
use crate::orchestrator::{BatchStats, Orchestrator};
use crate::partition::partition;
use crate::report::Reporter;
use crate::store::ResultStore;

/// What one batch produced.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Ranked consensus, most-agreed rule first.
    pub entries: Vec<ConsensusEntry>,
    /// Concatenated run summaries, in completion order.
    pub summary: String,
    pub stats: BatchStats,
}

/// Runs one batch over `dataset` and hands the ranking to `reporter`.
///
/// Configuration problems abort before any job is created. Individual mining
/// jobs may fail without failing the batch; the shortfall is logged and
/// visible in [`BatchOutcome::stats`].
#[instrument(skip_all, fields(rows = dataset.num_rows(), adapter = adapter.name()))]
pub fn run_batch(
    dataset: &Dataset,
    config: &ConcordConfig,
    adapter: Arc<dyn MiningAdapter>,
    reporter: &dyn Reporter,
) -> Result<BatchOutcome, PipelineError> {
    ConcordConfig::validate(config)?;

    let parameters = config.mining.to_parameters();
    let attributes = dataset.schema().num_attributes();
    if let Some(class) = parameters.class_index {
        if class >= attributes {
            return Err(ConfigError::ValidationFailed {
                field: "mining.class_index".to_string(),
                message: format!("{} is outside the schema ({attributes} attributes)", class + 1),
            }
            .into());
        }
    }

    let partitions = partition(dataset, config.partitioning.effective_partitions())?;
    let submitted = partitions.len();

    let store = Arc::new(ResultStore::new());
    let stats = Orchestrator::from_config(&config.orchestrator).run(
        partitions,
        &parameters,
        adapter,
        Arc::clone(&store),
    )?;

    let collected = store.run_count();
    if collected < submitted {
        warn!(
            collected,
            submitted,
            failed_partitions = ?stats.failed_partitions(),
            "fewer runs collected than partitions submitted"
        );
    }

    store.set_schema(dataset.schema().with_class_index(parameters.class_index))?;
    let schema = store.schema().ok_or(StoreError::SchemaMissing)?;
    let runs = store.runs()?;
    let options = ConsensusOptions {
        include_unmatched: config.report.effective_include_unmatched(),
    };
    let entries = match_rules(&runs, schema, options);
    let summary = store.summary()?;

    reporter.report(&entries, &summary)?;

    info!(
        runs = runs.len(),
        entries = entries.len(),
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "batch complete"
    );
    Ok(BatchOutcome {
        entries,
        summary,
        stats,
    })
}
