//! Concurrency-safe accumulator for mining results.
//!
//! One store is constructed per batch and shared with the workers by `Arc`.
//! Its two collections only grow; nothing may read them for consensus before
//! the orchestrator has reported batch completion.

use std::sync::{Mutex, MutexGuard, OnceLock};

use concord_core::errors::StoreError;
use concord_core::model::{RunResult, Schema};
use tracing::debug;

/// Collected runs, accumulated run summaries, and the batch schema.
#[derive(Debug, Default)]
pub struct ResultStore {
    runs: Mutex<Vec<RunResult>>,
    summary: Mutex<String>,
    schema: OnceLock<Schema>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a run after checking its antecedent/consequent invariant.
    ///
    /// A mismatched run is rejected and nothing is stored.
    pub fn add_run(&self, result: RunResult) -> Result<(), StoreError> {
        result.validate()?;
        let mut runs = lock(&self.runs)?;
        runs.push(result);
        debug!(collected = runs.len(), "run stored");
        Ok(())
    }

    /// Appends `text` followed by a blank line to the run-summary report.
    pub fn add_summary(&self, text: &str) -> Result<(), StoreError> {
        let mut summary = lock(&self.summary)?;
        summary.push_str(text);
        summary.push_str("\n\n");
        Ok(())
    }

    /// Sets the schema used for canonicalization. Allowed exactly once.
    pub fn set_schema(&self, schema: Schema) -> Result<(), StoreError> {
        self.schema
            .set(schema)
            .map_err(|_| StoreError::SchemaAlreadySet)
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.get()
    }

    /// Number of runs collected so far.
    pub fn run_count(&self) -> usize {
        self.runs.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Snapshot of the collected runs, in arrival order.
    pub fn runs(&self) -> Result<Vec<RunResult>, StoreError> {
        Ok(lock(&self.runs)?.clone())
    }

    /// Snapshot of the accumulated summary text.
    pub fn summary(&self) -> Result<String, StoreError> {
        Ok(lock(&self.summary)?.clone())
    }

    /// Consumes the store once the batch is over.
    pub fn into_parts(self) -> Result<(Vec<RunResult>, String, Option<Schema>), StoreError> {
        let runs = self
            .runs
            .into_inner()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        let summary = self
            .summary
            .into_inner()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok((runs, summary, self.schema.into_inner()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex.lock().map_err(|e| StoreError::Poisoned(e.to_string()))
}
