//! Job orchestrator: one mining job per partition on a fixed worker pool.
//!
//! The pool size is independent of the number of partitions. Each job reports
//! exactly one [`JobOutcome`] over a completion channel; the orchestrator
//! blocks on that channel until every submitted job has settled, waking every
//! `poll_interval` to log progress. A job that fails or panics is contained:
//! it is logged, counted, and adds nothing to the store.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, error, info, instrument, warn};

use concord_core::config::OrchestratorConfig;
use concord_core::errors::PipelineError;
use concord_core::model::{MinedRun, MiningParameters, Partition};

use crate::mining::MiningAdapter;
use crate::store::ResultStore;

/// Terminal state of one mining job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Run and summary were stored.
    Succeeded { partition: usize, rules: usize },
    /// The adapter returned an error or panicked.
    Failed { partition: usize, message: String },
    /// The adapter returned a run the store refused.
    Rejected { partition: usize, message: String },
}

impl JobOutcome {
    pub fn partition(&self) -> usize {
        match self {
            Self::Succeeded { partition, .. }
            | Self::Failed { partition, .. }
            | Self::Rejected { partition, .. } => *partition,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Aggregate counts for one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
    /// One entry per settled job, ordered by partition index.
    pub outcomes: Vec<JobOutcome>,
}

impl BatchStats {
    /// True when every submitted job stored its run.
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.submitted
    }

    /// Indices of partitions whose job did not store a run.
    pub fn failed_partitions(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(JobOutcome::partition)
            .collect()
    }
}

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Schedules mining jobs on a fixed-size pool.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    workers: usize,
    poll_interval: Duration,
}

impl Orchestrator {
    /// Zero workers become one; the poll interval is at least 1 ms.
    pub fn new(workers: usize, poll_interval: Duration) -> Self {
        Self {
            workers: workers.max(1),
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
        }
    }

    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new(config.effective_workers(), config.effective_poll_interval())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Runs one job per partition and blocks until all have settled.
    ///
    /// Only failure to build the worker pool is an error; per-job failures are
    /// reflected in the returned [`BatchStats`].
    #[instrument(skip_all, fields(partitions = partitions.len(), workers = self.workers, adapter = adapter.name()))]
    pub fn run(
        &self,
        partitions: Vec<Partition>,
        parameters: &MiningParameters,
        adapter: Arc<dyn MiningAdapter>,
        store: Arc<ResultStore>,
    ) -> Result<BatchStats, PipelineError> {
        let start = Instant::now();
        let submitted = partitions.len();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("concord-worker-{i}"))
            .build()
            .map_err(|e| PipelineError::WorkerPool(e.to_string()))?;

        let (tx, rx) = crossbeam_channel::unbounded::<JobOutcome>();
        for partition in partitions {
            let tx = tx.clone();
            let adapter = Arc::clone(&adapter);
            let store = Arc::clone(&store);
            let params = parameters.clone();
            pool.spawn(move || {
                let outcome = run_job(adapter.as_ref(), &partition, &params, &store);
                // The receiver outlives every job.
                let _ = tx.send(outcome);
            });
        }
        drop(tx);

        let mut stats = BatchStats {
            submitted,
            ..BatchStats::default()
        };
        let mut settled = 0usize;
        while settled < submitted {
            match rx.recv_timeout(self.poll_interval) {
                Ok(outcome) => {
                    settled += 1;
                    if outcome.is_success() {
                        stats.succeeded += 1;
                    } else {
                        stats.failed += 1;
                    }
                    stats.outcomes.push(outcome);
                }
                Err(RecvTimeoutError::Timeout) => {
                    info!(
                        settled,
                        submitted,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "still waiting for mining jobs"
                    );
                }
                Err(RecvTimeoutError::Disconnected) => {
                    let lost = submitted - settled;
                    error!(lost, "completion channel closed before all jobs settled");
                    stats.failed += lost;
                    break;
                }
            }
        }

        stats.elapsed = start.elapsed();
        stats.outcomes.sort_by_key(JobOutcome::partition);
        info!(
            submitted = stats.submitted,
            succeeded = stats.succeeded,
            failed = stats.failed,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "batch settled"
        );
        Ok(stats)
    }
}

/// Mines one partition and stores its output, containing any failure.
fn run_job(
    adapter: &dyn MiningAdapter,
    partition: &Partition,
    params: &MiningParameters,
    store: &ResultStore,
) -> JobOutcome {
    let index = partition.index();
    let mined = catch_unwind(AssertUnwindSafe(|| adapter.mine(partition, params)));

    let MinedRun { result, summary } = match mined {
        Ok(Ok(run)) => run,
        Ok(Err(e)) => {
            warn!(partition = index, error = %e, "mining job failed");
            return JobOutcome::Failed {
                partition: index,
                message: e.to_string(),
            };
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(partition = index, panic = %message, "mining job panicked");
            return JobOutcome::Failed {
                partition: index,
                message,
            };
        }
    };

    let rules = result.len();
    if let Err(e) = store.add_run(result) {
        warn!(partition = index, error = %e, "mining job output rejected");
        return JobOutcome::Rejected {
            partition: index,
            message: e.to_string(),
        };
    }
    debug!(partition = index, summary = %summary, "run summary");
    if let Err(e) = store.add_summary(&summary) {
        warn!(partition = index, error = %e, "run summary not stored");
    }

    info!(partition = index, rules, "mining job finished");
    JobOutcome::Succeeded {
        partition: index,
        rules,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use concord_core::errors::MiningError;
    use concord_core::model::{Attribute, Itemset, RunResult, Schema};

    /// Returns one fixed rule per partition; misbehaves on chosen partitions.
    struct ScriptedAdapter {
        fail_on: Option<usize>,
        panic_on: Option<usize>,
        mismatch_on: Option<usize>,
        calls: AtomicUsize,
    }

    impl ScriptedAdapter {
        fn well_behaved() -> Self {
            Self {
                fail_on: None,
                panic_on: None,
                mismatch_on: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl MiningAdapter for ScriptedAdapter {
        fn name(&self) -> &str {
            "scripted"
        }

        fn mine(
            &self,
            partition: &Partition,
            _params: &MiningParameters,
        ) -> Result<MinedRun, MiningError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let index = partition.index();
            if self.fail_on == Some(index) {
                return Err(MiningError::AdapterFailed {
                    adapter: "scripted".into(),
                    message: "boom".into(),
                });
            }
            if self.panic_on == Some(index) {
                panic!("adapter panicked on partition {index}");
            }
            let result = if self.mismatch_on == Some(index) {
                RunResult::new(vec![Itemset::new()], vec![])
            } else {
                RunResult::new(
                    vec![Itemset::from_pairs([(0, 0)])],
                    vec![Itemset::from_pairs([(0, 0)])],
                )
            };
            Ok(MinedRun {
                result,
                summary: format!("run {index}"),
            })
        }
    }

    fn partitions(count: usize) -> Vec<Partition> {
        let schema = Arc::new(Schema::new(
            "p",
            vec![Attribute::new("a", vec!["x".into()])],
        ));
        (0..count)
            .map(|i| Partition::new(i, Arc::clone(&schema), vec![vec![Some(0)]]))
            .collect()
    }

    fn orchestrator(workers: usize) -> Orchestrator {
        Orchestrator::new(workers, Duration::from_millis(10))
    }

    #[test]
    fn every_partition_gets_exactly_one_job() {
        let adapter = Arc::new(ScriptedAdapter::well_behaved());
        let store = Arc::new(ResultStore::new());
        let stats = orchestrator(3)
            .run(
                partitions(7),
                &MiningParameters::default(),
                adapter.clone(),
                Arc::clone(&store),
            )
            .unwrap();

        assert_eq!(adapter.calls.load(Ordering::SeqCst), 7);
        assert_eq!(stats.submitted, 7);
        assert_eq!(stats.succeeded, 7);
        assert!(stats.is_complete());
        assert_eq!(store.run_count(), 7);
    }

    #[test]
    fn more_workers_than_partitions_is_fine() {
        let store = Arc::new(ResultStore::new());
        let stats = orchestrator(16)
            .run(
                partitions(2),
                &MiningParameters::default(),
                Arc::new(ScriptedAdapter::well_behaved()),
                Arc::clone(&store),
            )
            .unwrap();
        assert_eq!(stats.succeeded, 2);
    }

    #[test]
    fn failures_and_panics_are_contained() {
        let adapter = Arc::new(ScriptedAdapter {
            fail_on: Some(1),
            panic_on: Some(2),
            mismatch_on: Some(3),
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(ResultStore::new());
        let stats = orchestrator(2)
            .run(
                partitions(5),
                &MiningParameters::default(),
                adapter,
                Arc::clone(&store),
            )
            .unwrap();

        assert_eq!(stats.submitted, 5);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 3);
        assert!(!stats.is_complete());
        assert_eq!(store.run_count(), 2);
        let summary = store.summary().unwrap();
        assert!(summary.contains("run 0"));
        assert!(!summary.contains("run 3"));

        assert_eq!(stats.failed_partitions(), vec![1, 2, 3]);
        assert!(matches!(stats.outcomes[2], JobOutcome::Failed { partition: 2, ref message } if message.contains("panicked")));
        assert!(matches!(stats.outcomes[3], JobOutcome::Rejected { partition: 3, .. }));
        assert_eq!(stats.outcomes[4], JobOutcome::Succeeded { partition: 4, rules: 1 });
    }

    /// Records the highest number of `mine` calls in flight at once.
    struct ConcurrencyGauge {
        live: AtomicUsize,
        peak: AtomicUsize,
    }

    impl MiningAdapter for ConcurrencyGauge {
        fn name(&self) -> &str {
            "gauge"
        }

        fn mine(
            &self,
            partition: &Partition,
            _params: &MiningParameters,
        ) -> Result<MinedRun, MiningError> {
            let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(30));
            self.live.fetch_sub(1, Ordering::SeqCst);
            Ok(MinedRun {
                result: RunResult::default(),
                summary: format!("run {}", partition.index()),
            })
        }
    }

    #[test]
    fn concurrent_jobs_never_exceed_worker_count() {
        let gauge = Arc::new(ConcurrencyGauge {
            live: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let stats = Orchestrator::new(3, Duration::from_millis(5))
            .run(
                partitions(10),
                &MiningParameters::default(),
                gauge.clone(),
                Arc::new(ResultStore::new()),
            )
            .unwrap();

        assert_eq!(stats.succeeded, 10);
        let peak = gauge.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "{peak} jobs ran at once on 3 workers");
        assert!(peak >= 1);
    }

    #[test]
    fn no_partitions_settles_immediately() {
        let stats = orchestrator(1)
            .run(
                Vec::new(),
                &MiningParameters::default(),
                Arc::new(ScriptedAdapter::well_behaved()),
                Arc::new(ResultStore::new()),
            )
            .unwrap();
        assert_eq!(stats.submitted, 0);
        assert!(stats.is_complete());
    }

    #[test]
    fn zero_workers_is_clamped_to_one() {
        assert_eq!(Orchestrator::new(0, Duration::from_secs(1)).workers(), 1);
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let orchestrator = Orchestrator::new(2, Duration::ZERO);
        assert_eq!(orchestrator.poll_interval(), Duration::from_millis(1));
        let stats = orchestrator
            .run(
                partitions(3),
                &MiningParameters::default(),
                Arc::new(ScriptedAdapter::well_behaved()),
                Arc::new(ResultStore::new()),
            )
            .unwrap();
        assert!(stats.is_complete());
    }

    /// Shared in-memory log sink.
    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn finished_job_logs_its_summary_at_debug() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let store = ResultStore::new();
        let outcome = tracing::subscriber::with_default(subscriber, || {
            run_job(
                &ScriptedAdapter::well_behaved(),
                &partitions(1)[0],
                &MiningParameters::default(),
                &store,
            )
        });

        assert!(outcome.is_success());
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("DEBUG"));
        assert!(logs.contains("run summary"));
        assert!(logs.contains("summary=run 0"));
    }

    #[test]
    fn panic_payloads_are_rendered() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "non-string panic payload");
    }
}
