//! Level-wise Apriori miner with iterative support lowering.
//!
//! Minimum support starts at the upper bound and is lowered by `support_delta`
//! per cycle until the run finds at least `max_rules` rules meeting the metric
//! threshold, or the next step would drop below the lower bound. In
//! class-association mode every rule predicts a single class value and the
//! class attribute never appears in an antecedent.

use std::fmt::Write as _;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use concord_core::errors::MiningError;
use concord_core::model::{
    Itemset, MetricType, MinedRun, MiningParameters, Partition, Row, Rule, RunResult, Schema,
};

use super::MiningAdapter;

/// Sorted `(attribute, value)` pairs, at most one per attribute.
type Items = Vec<(usize, usize)>;

/// Reference Apriori implementation of [`MiningAdapter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AprioriMiner;

impl AprioriMiner {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone)]
struct ScoredRule {
    antecedent: Items,
    consequent: Items,
    antecedent_count: usize,
    rule_count: usize,
    confidence: f64,
    lift: f64,
}

impl ScoredRule {
    fn metric(&self, metric: MetricType) -> f64 {
        match metric {
            MetricType::Confidence => self.confidence,
            MetricType::Lift => self.lift,
        }
    }
}

/// Frequent itemsets of one cycle, keyed by items, with their row counts.
struct Lattice {
    counts: FxHashMap<Items, usize>,
    level_sizes: Vec<usize>,
}

impl MiningAdapter for AprioriMiner {
    fn name(&self) -> &str {
        "apriori"
    }

    fn mine(
        &self,
        partition: &Partition,
        params: &MiningParameters,
    ) -> Result<MinedRun, MiningError> {
        check_parameters(partition.schema(), params)?;
        if partition.is_empty() {
            return Err(MiningError::EmptyPartition {
                partition: partition.index(),
            });
        }

        let rows = partition.rows();
        let n = rows.len();
        let upper = params.upper_bound_min_support;
        let lower = params.lower_bound_min_support;

        let mut step = 0u32;
        let (min_support, lattice, mut rules) = loop {
            let min_support = upper - params.support_delta * f64::from(step);
            let min_count = support_count(min_support, n);
            let lattice = frequent_itemsets(rows, min_count, params.class_index);
            let rules = match params.class_index {
                Some(class) => class_rules(rows, &lattice, class, min_count, params),
                None => association_rules(&lattice, n, params),
            };
            let next = upper - params.support_delta * f64::from(step + 1);
            if rules.len() >= params.max_rules || next < lower - f64::EPSILON {
                break (min_support, lattice, rules);
            }
            step += 1;
        };

        rank(&mut rules, params.metric);
        rules.truncate(params.max_rules);

        debug!(
            partition = partition.index(),
            cycles = step + 1,
            min_support,
            rules = rules.len(),
            "apriori finished"
        );

        let summary = render_summary(
            partition,
            params,
            min_support,
            step + 1,
            &lattice,
            &rules,
        );
        let result = RunResult::from_rules(rules.into_iter().map(|r| {
            Rule::new(
                Itemset::from_pairs(r.antecedent),
                Itemset::from_pairs(r.consequent),
            )
        }));

        Ok(MinedRun { result, summary })
    }
}

fn check_parameters(schema: &Schema, params: &MiningParameters) -> Result<(), MiningError> {
    if params.max_rules == 0 {
        return Err(invalid("max_rules", "must be at least 1"));
    }
    if params.support_delta.is_nan() || params.support_delta <= 0.0 {
        return Err(invalid("support_delta", "must be greater than 0"));
    }
    if params.lower_bound_min_support > params.upper_bound_min_support {
        return Err(invalid(
            "lower_bound_min_support",
            "must not exceed upper_bound_min_support",
        ));
    }
    if let Some(index) = params.class_index {
        if index >= schema.num_attributes() {
            return Err(MiningError::ClassIndexOutOfRange {
                index,
                attributes: schema.num_attributes(),
            });
        }
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> MiningError {
    MiningError::InvalidParameter {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Row count a support fraction corresponds to, never below one row.
fn support_count(fraction: f64, rows: usize) -> usize {
    let count = (fraction * rows as f64 + 0.5).floor();
    if count < 1.0 {
        1
    } else {
        count as usize
    }
}

fn count_rows(rows: &[Row], items: &[(usize, usize)]) -> usize {
    rows.iter()
        .filter(|row| items.iter().all(|&(a, v)| row.get(a).copied().flatten() == Some(v)))
        .count()
}

/// Level-wise frequent itemset generation with subset pruning.
///
/// `excluded` keeps an attribute (the class) out of every itemset.
fn frequent_itemsets(rows: &[Row], min_count: usize, excluded: Option<usize>) -> Lattice {
    let mut singles: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    for row in rows {
        for (attribute, value) in row.iter().enumerate() {
            if Some(attribute) == excluded {
                continue;
            }
            if let Some(value) = *value {
                *singles.entry((attribute, value)).or_insert(0) += 1;
            }
        }
    }

    let mut level: Vec<Items> = singles
        .into_iter()
        .filter(|&(_, count)| count >= min_count)
        .map(|(item, _)| vec![item])
        .collect();
    level.sort();

    let mut counts: FxHashMap<Items, usize> = FxHashMap::default();
    let mut level_sizes = Vec::new();
    for items in &level {
        counts.insert(items.clone(), count_rows(rows, items));
    }

    while !level.is_empty() {
        level_sizes.push(level.len());
        let known: FxHashSet<&Items> = level.iter().collect();
        let mut next: Vec<Items> = Vec::new();

        for (i, left) in level.iter().enumerate() {
            for right in &level[i + 1..] {
                let k = left.len();
                if left[..k - 1] != right[..k - 1] {
                    break;
                }
                // One value per attribute.
                if left[k - 1].0 == right[k - 1].0 {
                    continue;
                }
                let mut candidate = left.clone();
                candidate.push(right[k - 1]);
                candidate.sort_unstable();

                let all_subsets_frequent = (0..candidate.len()).all(|skip| {
                    let subset: Items = candidate
                        .iter()
                        .enumerate()
                        .filter(|&(idx, _)| idx != skip)
                        .map(|(_, &item)| item)
                        .collect();
                    known.contains(&subset)
                });
                if !all_subsets_frequent {
                    continue;
                }

                let count = count_rows(rows, &candidate);
                if count >= min_count {
                    counts.insert(candidate.clone(), count);
                    next.push(candidate);
                }
            }
        }

        next.sort();
        next.dedup();
        level = next;
    }

    Lattice {
        counts,
        level_sizes,
    }
}

/// Rules `A ==> C` for every frequent itemset split into two non-empty parts.
fn association_rules(lattice: &Lattice, n: usize, params: &MiningParameters) -> Vec<ScoredRule> {
    let mut rules = Vec::new();
    for (items, &rule_count) in &lattice.counts {
        if items.len() < 2 {
            continue;
        }
        let full = (1u64 << items.len()) - 1;
        for mask in 1..full {
            let mut antecedent = Items::new();
            let mut consequent = Items::new();
            for (idx, &item) in items.iter().enumerate() {
                if mask & (1 << idx) != 0 {
                    consequent.push(item);
                } else {
                    antecedent.push(item);
                }
            }
            let (Some(&antecedent_count), Some(&consequent_count)) =
                (lattice.counts.get(&antecedent), lattice.counts.get(&consequent))
            else {
                continue;
            };
            let confidence = rule_count as f64 / antecedent_count as f64;
            let lift = confidence / (consequent_count as f64 / n as f64);
            let rule = ScoredRule {
                antecedent,
                consequent,
                antecedent_count,
                rule_count,
                confidence,
                lift,
            };
            if rule.metric(params.metric) >= params.min_metric {
                rules.push(rule);
            }
        }
    }
    rules
}

/// Rules `A ==> class=c` for every frequent non-class itemset `A`.
fn class_rules(
    rows: &[Row],
    lattice: &Lattice,
    class: usize,
    min_count: usize,
    params: &MiningParameters,
) -> Vec<ScoredRule> {
    let n = rows.len();
    let mut class_counts: FxHashMap<usize, usize> = FxHashMap::default();
    for row in rows {
        if let Some(value) = row.get(class).copied().flatten() {
            *class_counts.entry(value).or_insert(0) += 1;
        }
    }

    let mut rules = Vec::new();
    for (antecedent, &antecedent_count) in &lattice.counts {
        let mut per_class: FxHashMap<usize, usize> = FxHashMap::default();
        for row in rows {
            if antecedent
                .iter()
                .all(|&(a, v)| row.get(a).copied().flatten() == Some(v))
            {
                if let Some(value) = row.get(class).copied().flatten() {
                    *per_class.entry(value).or_insert(0) += 1;
                }
            }
        }
        for (value, rule_count) in per_class {
            if rule_count < min_count {
                continue;
            }
            let confidence = rule_count as f64 / antecedent_count as f64;
            let class_count = class_counts.get(&value).copied().unwrap_or(rule_count);
            let lift = confidence / (class_count as f64 / n as f64);
            let rule = ScoredRule {
                antecedent: antecedent.clone(),
                consequent: vec![(class, value)],
                antecedent_count,
                rule_count,
                confidence,
                lift,
            };
            if rule.metric(params.metric) >= params.min_metric {
                rules.push(rule);
            }
        }
    }
    rules
}

/// Best metric first, then higher support, then item order for stability.
fn rank(rules: &mut [ScoredRule], metric: MetricType) {
    rules.sort_by(|a, b| {
        b.metric(metric)
            .total_cmp(&a.metric(metric))
            .then_with(|| b.rule_count.cmp(&a.rule_count))
            .then_with(|| a.antecedent.cmp(&b.antecedent))
            .then_with(|| a.consequent.cmp(&b.consequent))
    });
}

fn render_items(schema: &Schema, items: &[(usize, usize)]) -> String {
    items
        .iter()
        .map(|&(a, v)| {
            let name = schema.attribute(a).map_or("?", |attr| attr.name.as_str());
            let value = schema.value_name(a, v).unwrap_or("?");
            format!("{name}={value}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_summary(
    partition: &Partition,
    params: &MiningParameters,
    min_support: f64,
    cycles: u32,
    lattice: &Lattice,
    rules: &[ScoredRule],
) -> String {
    let schema = partition.schema();
    let n = partition.num_rows();
    let mut out = String::new();

    let _ = writeln!(out, "Apriori");
    let _ = writeln!(out, "=======");
    let _ = writeln!(out);
    let _ = writeln!(out, "Partition: {} ({} instances)", partition.index(), n);
    let _ = writeln!(
        out,
        "Minimum support: {:.3} ({} instances)",
        min_support,
        support_count(min_support, n)
    );
    let _ = writeln!(out, "Minimum metric <{}>: {}", params.metric, params.min_metric);
    if let Some(class) = params.class_index.and_then(|c| schema.attribute(c)) {
        let _ = writeln!(out, "Class attribute: {}", class.name);
    }
    let _ = writeln!(out, "Number of cycles performed: {cycles}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated sets of large itemsets:");
    for (level, size) in lattice.level_sizes.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Size of set of large itemsets L({}): {}", level + 1, size);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Best rules found:");
    let _ = writeln!(out);
    for (i, rule) in rules.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} {} ==> {} {}    <conf:({:.2})> lift:({:.2})",
            i + 1,
            render_items(schema, &rule.antecedent),
            rule.antecedent_count,
            render_items(schema, &rule.consequent),
            rule.rule_count,
            rule.confidence,
            rule.lift,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use concord_core::model::Attribute;

    /// color ∈ {red, blue}, size ∈ {small, large}; red rows are always large.
    fn partition(rows: Vec<Row>) -> Partition {
        let schema = Schema::new(
            "shapes",
            vec![
                Attribute::new("color", vec!["red".into(), "blue".into()]),
                Attribute::new("size", vec!["small".into(), "large".into()]),
            ],
        );
        Partition::new(0, Arc::new(schema), rows)
    }

    fn shapes() -> Partition {
        let mut rows = Vec::new();
        for _ in 0..6 {
            rows.push(vec![Some(0), Some(1)]);
        }
        for _ in 0..3 {
            rows.push(vec![Some(1), Some(0)]);
        }
        rows.push(vec![Some(1), Some(1)]);
        partition(rows)
    }

    fn params() -> MiningParameters {
        MiningParameters {
            max_rules: 10,
            min_metric: 0.9,
            ..MiningParameters::default()
        }
    }

    fn rules_of(run: &MinedRun) -> Vec<(Itemset, Itemset)> {
        run.result
            .rules()
            .map(|(a, c)| (a.clone(), c.clone()))
            .collect()
    }

    #[test]
    fn finds_the_deterministic_rule_first() {
        let run = AprioriMiner.mine(&shapes(), &params()).unwrap();
        let rules = rules_of(&run);
        assert!(!rules.is_empty());
        assert_eq!(
            rules[0],
            (Itemset::from_pairs([(0, 0)]), Itemset::from_pairs([(1, 1)]))
        );
        assert!(run.result.validate().is_ok());
        assert!(run.summary.contains("Best rules found:"));
        assert!(run.summary.contains("color=red 6 ==> size=large 6"));
    }

    #[test]
    fn confidence_threshold_filters_weak_rules() {
        let run = AprioriMiner.mine(&shapes(), &params()).unwrap();
        // size=large ==> color=red holds for 6 of 7 rows: below 0.9.
        let weak = (Itemset::from_pairs([(1, 1)]), Itemset::from_pairs([(0, 0)]));
        assert!(!rules_of(&run).contains(&weak));
    }

    #[test]
    fn rule_cap_truncates_output() {
        let capped = MiningParameters {
            max_rules: 1,
            min_metric: 0.0,
            ..MiningParameters::default()
        };
        let run = AprioriMiner.mine(&shapes(), &capped).unwrap();
        assert_eq!(run.result.len(), 1);
    }

    #[test]
    fn class_mode_predicts_only_the_class_attribute() {
        let car = MiningParameters {
            class_index: Some(1),
            min_metric: 0.5,
            ..MiningParameters::default()
        };
        let run = AprioriMiner.mine(&shapes(), &car).unwrap();
        assert!(!run.result.is_empty());
        for (antecedent, consequent) in run.result.rules() {
            assert!(!antecedent.contains_attribute(1));
            assert_eq!(consequent.len(), 1);
            assert!(consequent.contains_attribute(1));
        }
        assert!(run.summary.contains("Class attribute: size"));
    }

    #[test]
    fn missing_values_never_form_items() {
        let part = partition(vec![
            vec![None, Some(1)],
            vec![None, Some(1)],
            vec![None, Some(1)],
        ]);
        let relaxed = MiningParameters {
            min_metric: 0.0,
            ..MiningParameters::default()
        };
        let run = AprioriMiner.mine(&part, &relaxed).unwrap();
        assert!(run.result.is_empty());
    }

    #[test]
    fn empty_partition_is_an_error() {
        let err = AprioriMiner.mine(&partition(vec![]), &params()).unwrap_err();
        assert!(matches!(err, MiningError::EmptyPartition { partition: 0 }));
    }

    #[test]
    fn class_index_outside_schema_is_rejected() {
        let bad = MiningParameters {
            class_index: Some(9),
            ..MiningParameters::default()
        };
        assert!(matches!(
            AprioriMiner.mine(&shapes(), &bad),
            Err(MiningError::ClassIndexOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn support_count_rounds_and_never_drops_below_one() {
        assert_eq!(support_count(0.1, 10), 1);
        assert_eq!(support_count(0.25, 10), 3);
        assert_eq!(support_count(0.001, 10), 1);
    }
}
