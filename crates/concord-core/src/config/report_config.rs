//! Report output configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MATCHES_FILE, DEFAULT_RULES_FILE};
use crate::errors::ConfigError;

/// Layout of the ranked-matches destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One `<votes>: <rule>` line per entry.
    #[default]
    Text,
    /// JSON array of `{ "rule", "votes" }` objects.
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                field: "report.format".to_string(),
                message: format!("unknown format {other:?}, expected text or json"),
            }),
        }
    }
}

/// Where and how consensus output is written.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory both destinations are written to. Default: `.`.
    pub output_dir: Option<String>,
    /// Ranked-matches file name. Default: `rulematches`.
    pub matches_file: Option<String>,
    /// Raw run-summary file name. Default: `rules`.
    pub rules_file: Option<String>,
    pub format: Option<ReportFormat>,
    /// Also report rules that never matched across a run pair. Default: false.
    pub include_unmatched: Option<bool>,
}

impl ReportConfig {
    pub fn effective_output_dir(&self) -> PathBuf {
        PathBuf::from(self.output_dir.as_deref().unwrap_or("."))
    }

    pub fn matches_path(&self) -> PathBuf {
        self.effective_output_dir()
            .join(self.matches_file.as_deref().unwrap_or(DEFAULT_MATCHES_FILE))
    }

    pub fn rules_path(&self) -> PathBuf {
        self.effective_output_dir()
            .join(self.rules_file.as_deref().unwrap_or(DEFAULT_RULES_FILE))
    }

    pub fn effective_format(&self) -> ReportFormat {
        self.format.unwrap_or_default()
    }

    pub fn effective_include_unmatched(&self) -> bool {
        self.include_unmatched.unwrap_or(false)
    }
}
