//! Parameters passed unchanged to every mining job of a batch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOWER_BOUND_MIN_SUPPORT, DEFAULT_MAX_RULES, DEFAULT_MIN_METRIC,
    DEFAULT_SUPPORT_DELTA, DEFAULT_UPPER_BOUND_MIN_SUPPORT,
};
use crate::errors::ConfigError;

/// Metric used to rank and filter mined rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    #[default]
    Confidence,
    Lift,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confidence => f.write_str("confidence"),
            Self::Lift => f.write_str("lift"),
        }
    }
}

impl FromStr for MetricType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confidence" | "0" => Ok(Self::Confidence),
            "lift" | "1" => Ok(Self::Lift),
            other => Err(ConfigError::InvalidValue {
                field: "mining.metric".to_string(),
                message: format!("unknown metric {other:?}, expected confidence or lift"),
            }),
        }
    }
}

/// Mining parameters for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningParameters {
    /// Maximum number of rules a run reports.
    pub max_rules: usize,
    pub metric: MetricType,
    /// Minimum value of `metric` for a rule to be kept.
    pub min_metric: f64,
    /// Step by which minimum support is lowered per cycle.
    pub support_delta: f64,
    pub lower_bound_min_support: f64,
    pub upper_bound_min_support: f64,
    /// 0-based class attribute index; `Some` enables class-association mode.
    pub class_index: Option<usize>,
}

impl Default for MiningParameters {
    fn default() -> Self {
        Self {
            max_rules: DEFAULT_MAX_RULES,
            metric: MetricType::Confidence,
            min_metric: DEFAULT_MIN_METRIC,
            support_delta: DEFAULT_SUPPORT_DELTA,
            lower_bound_min_support: DEFAULT_LOWER_BOUND_MIN_SUPPORT,
            upper_bound_min_support: DEFAULT_UPPER_BOUND_MIN_SUPPORT,
            class_index: None,
        }
    }
}

/// Converts the 1-based, user-facing class index to the internal 0-based one.
///
/// Unset, zero, and negative values turn class-association mode off.
pub fn class_index_from_user(value: Option<i64>) -> Option<usize> {
    value
        .filter(|&v| v > 0)
        .and_then(|v| usize::try_from(v - 1).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_parses_names_and_numeric_selectors() {
        assert_eq!("Lift".parse::<MetricType>().unwrap(), MetricType::Lift);
        assert_eq!("0".parse::<MetricType>().unwrap(), MetricType::Confidence);
        assert!("leverage".parse::<MetricType>().is_err());
    }

    #[test]
    fn user_class_index_is_one_based() {
        assert_eq!(class_index_from_user(Some(3)), Some(2));
        assert_eq!(class_index_from_user(Some(1)), Some(0));
        assert_eq!(class_index_from_user(Some(0)), None);
        assert_eq!(class_index_from_user(Some(-1)), None);
        assert_eq!(class_index_from_user(None), None);
    }
}
