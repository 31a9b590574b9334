//! Output of one mining invocation.

use serde::{Deserialize, Serialize};

use super::{Itemset, Rule};
use crate::errors::StoreError;

/// Positional pairing of antecedents and consequents from one run.
///
/// Rule `k` of the run is `(antecedents[k], consequents[k])`. Both sequences
/// must have the same length; [`RunResult::validate`] checks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    antecedents: Vec<Itemset>,
    consequents: Vec<Itemset>,
}

impl RunResult {
    /// Pairs the two sequences without checking their lengths.
    pub fn new(antecedents: Vec<Itemset>, consequents: Vec<Itemset>) -> Self {
        Self {
            antecedents,
            consequents,
        }
    }

    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let (antecedents, consequents) = rules
            .into_iter()
            .map(|r| (r.antecedent, r.consequent))
            .unzip();
        Self {
            antecedents,
            consequents,
        }
    }

    pub fn antecedents(&self) -> &[Itemset] {
        &self.antecedents
    }

    pub fn consequents(&self) -> &[Itemset] {
        &self.consequents
    }

    /// Number of complete rules in the run.
    pub fn len(&self) -> usize {
        self.antecedents.len().min(self.consequents.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates rules as `(antecedent, consequent)` pairs.
    pub fn rules(&self) -> impl Iterator<Item = (&Itemset, &Itemset)> {
        self.antecedents.iter().zip(self.consequents.iter())
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.antecedents.len() != self.consequents.len() {
            return Err(StoreError::MismatchedRun {
                antecedents: self.antecedents.len(),
                consequents: self.consequents.len(),
            });
        }
        Ok(())
    }
}

/// What a mining adapter hands back for one partition.
#[derive(Debug, Clone, Default)]
pub struct MinedRun {
    pub result: RunResult,
    /// Free-text description of the run, for the raw-rules report.
    pub summary: String,
}
