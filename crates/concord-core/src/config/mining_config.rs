//! Mining parameter configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOWER_BOUND_MIN_SUPPORT, DEFAULT_MAX_RULES, DEFAULT_MIN_METRIC,
    DEFAULT_SUPPORT_DELTA, DEFAULT_UPPER_BOUND_MIN_SUPPORT,
};
use crate::model::params::class_index_from_user;
use crate::model::{MetricType, MiningParameters};

/// Parameters forwarded to every mining job.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MiningConfig {
    /// Rule cap per partition. Default: 10.
    pub max_rules: Option<usize>,
    /// Ranking metric. Default: confidence.
    pub metric: Option<MetricType>,
    /// Minimum metric value. Default: 0.6.
    pub min_metric: Option<f64>,
    /// Support decrement per cycle. Default: 0.001.
    pub support_delta: Option<f64>,
    /// Default: 0.001.
    pub lower_bound_min_support: Option<f64>,
    /// Default: 0.1.
    pub upper_bound_min_support: Option<f64>,
    /// 1-based class attribute index; unset, 0, or negative disables
    /// class-association mode.
    pub class_index: Option<i64>,
}

impl MiningConfig {
    pub fn effective_max_rules(&self) -> usize {
        self.max_rules.unwrap_or(DEFAULT_MAX_RULES)
    }

    pub fn effective_min_metric(&self) -> f64 {
        self.min_metric.unwrap_or(DEFAULT_MIN_METRIC)
    }

    pub fn effective_support_delta(&self) -> f64 {
        self.support_delta.unwrap_or(DEFAULT_SUPPORT_DELTA)
    }

    pub fn effective_lower_bound(&self) -> f64 {
        self.lower_bound_min_support
            .unwrap_or(DEFAULT_LOWER_BOUND_MIN_SUPPORT)
    }

    pub fn effective_upper_bound(&self) -> f64 {
        self.upper_bound_min_support
            .unwrap_or(DEFAULT_UPPER_BOUND_MIN_SUPPORT)
    }

    /// 0-based class attribute index, if class-association mode is on.
    pub fn effective_class_index(&self) -> Option<usize> {
        class_index_from_user(self.class_index)
    }

    /// Resolves the parameter set handed to each mining job.
    pub fn to_parameters(&self) -> MiningParameters {
        MiningParameters {
            max_rules: self.effective_max_rules(),
            metric: self.metric.unwrap_or_default(),
            min_metric: self.effective_min_metric(),
            support_delta: self.effective_support_delta(),
            lower_bound_min_support: self.effective_lower_bound(),
            upper_bound_min_support: self.effective_upper_bound(),
            class_index: self.effective_class_index(),
        }
    }
}
