use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ExportError;
use crate::analysis::{AnalysisConfig, ControlBranch, ResponseMeasurement};
use crate::recording::ExperimentKind;

/// Per-recording status in a run summary
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordStatus {
    /// Recording was measured
    Measured {
        /// Full measurement, including the located step and window anchor
        measurement: ResponseMeasurement,
    },
    /// Recording was skipped
    Rejected {
        /// Human-readable reason
        reason: String,
    },
}

/// One recording in a run summary
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRecord {
    /// Recording file name
    pub filename: String,
    /// Outcome
    #[serde(flatten)]
    pub status: RecordStatus,
}

/// JSON sidecar describing one `analyze` run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Tool version that produced the run
    pub tool_version: String,
    /// When the run finished
    pub analyzed_at: DateTime<Utc>,
    /// Cell folder
    pub folder: String,
    /// Experiment kind
    pub experiment: ExperimentKind,
    /// Branch applied to every recording
    pub branch: ControlBranch,
    /// Effective parameters
    pub config: AnalysisConfig,
    /// Per-recording outcomes in file order
    pub records: Vec<SummaryRecord>,
}

impl RunSummary {
    /// Start an empty summary stamped with the current time
    pub fn new(
        folder: impl Into<String>,
        experiment: ExperimentKind,
        branch: ControlBranch,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            analyzed_at: Utc::now(),
            folder: folder.into(),
            experiment,
            branch,
            config,
            records: Vec::new(),
        }
    }

    /// Record a measured recording
    pub fn add_measured(&mut self, filename: impl Into<String>, measurement: ResponseMeasurement) {
        self.records.push(SummaryRecord {
            filename: filename.into(),
            status: RecordStatus::Measured { measurement },
        });
    }

    /// Record a rejected recording
    pub fn add_rejected(&mut self, filename: impl Into<String>, reason: impl Into<String>) {
        self.records.push(SummaryRecord {
            filename: filename.into(),
            status: RecordStatus::Rejected {
                reason: reason.into(),
            },
        });
    }

    /// Sidecar path for a measurement table: `rows.csv` -> `rows.summary.json`
    pub fn sidecar_path(table: &Path) -> PathBuf {
        table.with_extension("summary.json")
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON sidecar
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
