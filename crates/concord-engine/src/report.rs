//! Persisting the consensus ranking and the raw run summaries.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use concord_core::config::{ReportConfig, ReportFormat};
use concord_core::errors::ReportError;
use concord_core::model::ConsensusEntry;

/// Destination for one batch's output.
pub trait Reporter: Send + Sync {
    fn report(&self, entries: &[ConsensusEntry], summary: &str) -> Result<(), ReportError>;
}

/// Writes the ranked matches and the run summaries to two files.
///
/// Text format writes one `"<votes>: <rule>"` line per entry; JSON writes an
/// array of `{"rule", "votes"}` objects. The summary file is always the raw
/// accumulated text.
#[derive(Debug, Clone)]
pub struct FileReporter {
    matches_path: PathBuf,
    rules_path: PathBuf,
    format: ReportFormat,
}

impl FileReporter {
    pub fn new(matches_path: impl Into<PathBuf>, rules_path: impl Into<PathBuf>) -> Self {
        Self {
            matches_path: matches_path.into(),
            rules_path: rules_path.into(),
            format: ReportFormat::Text,
        }
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.matches_path(), config.rules_path()).with_format(config.effective_format())
    }

    pub fn matches_path(&self) -> &Path {
        &self.matches_path
    }

    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }
}

impl Reporter for FileReporter {
    fn report(&self, entries: &[ConsensusEntry], summary: &str) -> Result<(), ReportError> {
        write_file(&self.matches_path, |out| match self.format {
            ReportFormat::Text => {
                for entry in entries {
                    writeln!(out, "{}: {}", entry.votes, entry.rule)?;
                }
                Ok(())
            }
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, entries).map_err(std::io::Error::from)?;
                writeln!(out)
            }
        })?;
        write_file(&self.rules_path, |out| out.write_all(summary.as_bytes()))?;

        info!(
            entries = entries.len(),
            matches = %self.matches_path.display(),
            rules = %self.rules_path.display(),
            format = %self.format,
            "report written"
        );
        Ok(())
    }
}

fn write_file<F>(path: &Path, body: F) -> Result<(), ReportError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let failed = |e: std::io::Error| ReportError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(failed)?;
    }
    let mut out = BufWriter::new(File::create(path).map_err(failed)?);
    body(&mut out).map_err(failed)?;
    out.flush().map_err(failed)
}
