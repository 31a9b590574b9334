//! Contiguous, order-preserving dataset partitioning.
//!
//! Rows are never shuffled or sampled. Partitions are only independent
//! samples if the source row order carries no systematic bias; shuffling
//! beforehand is the caller's responsibility.

use std::sync::Arc;

use concord_core::errors::ConfigError;
use concord_core::model::{Dataset, Partition};

/// Splits `dataset` into `count` contiguous partitions.
///
/// With `base = rows / count`, partitions `0..count-1` hold exactly `base`
/// rows each and the last partition holds the remainder as well. When there
/// are fewer rows than partitions the leading partitions are empty.
pub fn partition(dataset: &Dataset, count: usize) -> Result<Vec<Partition>, ConfigError> {
    if count == 0 {
        return Err(ConfigError::ValidationFailed {
            field: "partitioning.partitions".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    let rows = dataset.rows();
    let base = rows.len() / count;
    let schema = Arc::clone(dataset.schema());

    let partitions = (0..count)
        .map(|i| {
            let start = i * base;
            let end = if i == count - 1 { rows.len() } else { start + base };
            Partition::new(i, Arc::clone(&schema), rows[start..end].to_vec())
        })
        .collect();

    Ok(partitions)
}
