use std::fmt;
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::analysis::{AnalysisError, ControlBranch, ResponseMeasurement};
use crate::export::{MeasurementRow, RunSummary};
use crate::recording::ExperimentKind;

/// Why a recording was skipped
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BatchRejection {
    /// The file could not be loaded as a valid trace
    #[error("load failed: {0}")]
    Recording(String),

    /// The trace loaded but analysis rejected it
    #[error("{0}")]
    Analysis(#[from] AnalysisError),
}

/// Outcome for a single recording in a batch
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Recording path
    pub path: PathBuf,
    /// Recording file name
    pub filename: String,
    /// Measurement or rejection reason
    pub outcome: Result<ResponseMeasurement, BatchRejection>,
}

impl BatchEntry {
    /// True if the recording was measured
    pub fn is_measured(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Report for one hold folder
#[derive(Debug)]
pub struct BatchReport {
    /// Cell folder label written into rows
    pub folder: String,
    /// Experiment kind
    pub experiment: ExperimentKind,
    /// Branch applied to every recording
    pub branch: ControlBranch,
    /// Entries in file order
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// Number of measured recordings
    pub fn measured_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_measured()).count()
    }

    /// Number of rejected recordings
    pub fn rejected_count(&self) -> usize {
        self.entries.len() - self.measured_count()
    }

    /// True if there was at least one recording and none were measured
    pub fn all_rejected(&self) -> bool {
        !self.entries.is_empty() && self.measured_count() == 0
    }

    /// Output rows for the measured recordings, in file order
    pub fn rows(&self) -> Vec<MeasurementRow> {
        self.entries
            .iter()
            .filter_map(|e| {
                e.outcome
                    .as_ref()
                    .ok()
                    .map(|m| MeasurementRow::from_measurement(&self.folder, &e.filename, m))
            })
            .collect()
    }

    /// Convert into a JSON run summary
    pub fn to_summary(&self, config: crate::analysis::AnalysisConfig) -> RunSummary {
        let mut summary = RunSummary::new(&self.folder, self.experiment, self.branch, config);
        for entry in &self.entries {
            match &entry.outcome {
                Ok(m) => summary.add_measured(&entry.filename, m.clone()),
                Err(reason) => summary.add_rejected(&entry.filename, reason.to_string()),
            }
        }
        summary
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[SKIP]");

            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Hold Analysis Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("====================").cyan()));
            output.push_str(&format!("{}: {}\n", style("Folder").bold(), self.folder));
            output.push_str(&format!(
                "{}: {} / {}\n\n",
                style("Experiment").bold(),
                self.experiment,
                self.branch
            ));

            for entry in &self.entries {
                match &entry.outcome {
                    Ok(m) => output.push_str(&format!(
                        "[{}] {} - diff {} pA (window {}..{})\n",
                        OK,
                        style(&entry.filename).green(),
                        style(format!("{:.3}", m.delta())).bold(),
                        m.window().start,
                        m.window().end
                    )),
                    Err(reason) => output.push_str(&format!(
                        "[{}] {} - {}: {}\n",
                        FAIL,
                        style(&entry.filename).red(),
                        style("REJECTED").red().bold(),
                        reason
                    )),
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} measured, {} rejected\n",
                style("Summary").bold(),
                style(self.measured_count()).green(),
                style(self.rejected_count()).red()
            ));

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hold Analysis Report")?;
        writeln!(f, "====================")?;
        writeln!(f, "Folder: {}", self.folder)?;
        writeln!(f, "Experiment: {} / {}", self.experiment, self.branch)?;
        writeln!(f)?;

        for entry in &self.entries {
            match &entry.outcome {
                Ok(m) => writeln!(
                    f,
                    "[✓] {} - diff {:.3} pA (window {}..{})",
                    entry.filename,
                    m.delta(),
                    m.window().start,
                    m.window().end
                )?,
                Err(reason) => writeln!(f, "[✗] {} - REJECTED: {}", entry.filename, reason)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} measured, {} rejected",
            self.measured_count(),
            self.rejected_count()
        )
    }
}
