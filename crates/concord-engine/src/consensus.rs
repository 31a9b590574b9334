//! Cross-run rule consensus.
//!
//! Every pair of runs is compared rule by rule. Each structural match adds one
//! vote to the matched rule, so a rule produced identically by `m` runs ends
//! up with `m * (m - 1) / 2` votes. Cost is quadratic in both the number of
//! runs and the rules per run; both are expected to be in the tens.

use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument};

use concord_core::constants::RULE_SEPARATOR;
use concord_core::model::{ConsensusEntry, Itemset, RunResult, Schema};

/// Which side of a rule an itemset is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Antecedent,
    Consequent,
}

/// Ranking options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusOptions {
    /// Report rules that never matched across a run pair, with 0 votes.
    pub include_unmatched: bool,
}

/// Renders an itemset as `"<attr>=<value> "` terms in schema order.
///
/// With a class attribute set, the class attribute is left out of ordinary
/// renderings, and a single-item consequent is rendered as the class value.
/// Assignments outside the schema are not rendered.
pub fn canonicalize(itemset: &Itemset, schema: &Schema, side: Side) -> String {
    let mut out = String::new();
    let class_index = schema.class_index();

    if let (Some(class), Side::Consequent) = (schema.class_attribute(), side) {
        if itemset.len() == 1 {
            if let Some((_, value)) = itemset.iter().next() {
                push_term(&mut out, &class.name, class.value(value));
                return out;
            }
        }
    }

    for (index, attribute) in schema.attributes().iter().enumerate() {
        if Some(index) == class_index {
            continue;
        }
        if let Some(value) = itemset.get(index) {
            push_term(&mut out, &attribute.name, attribute.value(value));
        }
    }
    out
}

/// Canonical string key of the rule `antecedent ==> consequent`.
pub fn rule_key(antecedent: &Itemset, consequent: &Itemset, schema: &Schema) -> String {
    let mut key = canonicalize(antecedent, schema, Side::Antecedent);
    key.push_str(RULE_SEPARATOR);
    key.push_str(&canonicalize(consequent, schema, Side::Consequent));
    key
}

fn push_term(out: &mut String, name: &str, value: Option<&str>) {
    out.push_str(name);
    out.push('=');
    out.push_str(value.unwrap_or("?"));
    out.push(' ');
}

/// Counts pairwise agreement between runs and ranks the agreed rules.
///
/// Entries are sorted by descending vote count, ties by ascending rule key.
#[instrument(skip_all, fields(runs = runs.len()))]
pub fn match_rules(
    runs: &[RunResult],
    schema: &Schema,
    options: ConsensusOptions,
) -> Vec<ConsensusEntry> {
    let keys: Vec<Vec<String>> = runs
        .iter()
        .map(|run| {
            run.rules()
                .map(|(antecedent, consequent)| rule_key(antecedent, consequent, schema))
                .collect()
        })
        .collect();

    let mut votes: FxHashMap<&str, usize> = FxHashMap::default();
    let mut comparisons = 0usize;

    for i in 0..runs.len() {
        for j in (i + 1)..runs.len() {
            for (k, (ante_k, cons_k)) in runs[i].rules().enumerate() {
                for (ante_l, cons_l) in runs[j].rules() {
                    comparisons += 1;
                    if ante_k == ante_l && cons_k == cons_l {
                        *votes.entry(keys[i][k].as_str()).or_insert(0) += 1;
                    }
                }
            }
        }
    }
    debug!(comparisons, matched = votes.len(), "pairwise comparison complete");

    if options.include_unmatched {
        for key in keys.iter().flatten() {
            votes.entry(key.as_str()).or_insert(0);
        }
    }

    let mut entries: Vec<ConsensusEntry> = votes
        .into_iter()
        .map(|(rule, count)| ConsensusEntry::new(rule, count))
        .collect();
    entries.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.rule.cmp(&b.rule)));

    info!(
        entries = entries.len(),
        top_votes = entries.first().map_or(0, |e| e.votes),
        "consensus ranking complete"
    );
    entries
}
