//! # Batch Analysis
//!
//! Runs a [`StepResponseExtractor`] over every recording in a hold folder.
//! Each recording is independent: a load failure or an analysis rejection
//! is recorded in the [`BatchReport`] and the batch moves on.
//!
//! With the `parallel` feature, recordings are processed on the rayon
//! thread pool. Report order always follows the sorted file order.

mod report;


pub use report::{BatchEntry, BatchRejection, BatchReport};

use std::path::{Path, PathBuf};

use log::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analysis::{StepResponseExtractor, TraceOutcome};
use crate::recording::{load_trace, CellFolder, ExperimentKind, RecordingError};

/// Applies one extractor to many recordings
#[derive(Debug, Clone)]
pub struct BatchAnalyzer {
    extractor: StepResponseExtractor,
    sample_rate: Option<u32>,
    #[cfg(feature = "plots")]
    figures_dir: Option<PathBuf>,
}

impl BatchAnalyzer {
    /// Create a batch analyzer around an extractor
    pub fn new(extractor: StepResponseExtractor) -> Self {
        Self {
            extractor,
            sample_rate: None,
            #[cfg(feature = "plots")]
            figures_dir: None,
        }
    }

    /// Override the sample rate of every recording
    pub fn with_sample_rate(mut self, sample_rate: Option<u32>) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Render diagnostic plots for measured recordings into `dir`
    #[cfg(feature = "plots")]
    pub fn with_figures_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.figures_dir = dir;
        self
    }

    /// Extractor applied to every recording
    pub fn extractor(&self) -> &StepResponseExtractor {
        &self.extractor
    }

    /// Load and measure one recording
    pub fn analyze_file(&self, path: &Path) -> BatchEntry {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let outcome = match load_trace(path, self.sample_rate) {
            Ok(trace) => match self.extractor.run(&trace) {
                TraceOutcome::Measured(m) => {
                    #[cfg(feature = "plots")]
                    self.render_plots(&trace, &m);
                    Ok(m)
                }
                TraceOutcome::Rejected(e) => Err(BatchRejection::Analysis(e)),
            },
            Err(e) => {
                warn!("{}: rejected: {}", filename, e);
                Err(BatchRejection::Recording(e.to_string()))
            }
        };

        BatchEntry {
            path: path.to_path_buf(),
            filename,
            outcome,
        }
    }

    /// Measure a list of recordings, keeping input order
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> Vec<BatchEntry> {
        #[cfg(feature = "parallel")]
        {
            paths.par_iter().map(|p| self.analyze_file(p)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            paths.iter().map(|p| self.analyze_file(p)).collect()
        }
    }

    /// Measure every recording in a cell folder's hold folder.
    ///
    /// Fails only if the hold folder itself is missing or unreadable.
    pub fn analyze_cell(
        &self,
        cell: &CellFolder,
        experiment: ExperimentKind,
    ) -> Result<BatchReport, RecordingError> {
        let recordings = cell.recordings(experiment)?;
        info!(
            "Analyzing {} recording(s) in {}",
            recordings.len(),
            cell.hold_folder(experiment).display()
        );
        if recordings.is_empty() {
            warn!("{} contains no recordings", cell.hold_folder(experiment).display());
        }

        let entries = self.analyze_paths(&recordings);
        let report = BatchReport {
            folder: cell.label(),
            experiment,
            branch: self.extractor.branch(),
            entries,
        };

        info!(
            "{} measured, {} rejected",
            report.measured_count(),
            report.rejected_count()
        );
        Ok(report)
    }

    #[cfg(feature = "plots")]
    fn render_plots(&self, trace: &crate::trace::Trace, m: &crate::analysis::ResponseMeasurement) {
        if let Some(dir) = &self.figures_dir {
            if let Err(e) = crate::plot::render_diagnostics(dir, trace, m) {
                warn!(
                    "{}: diagnostic plot failed: {}",
                    trace.source().unwrap_or("<trace>"),
                    e
                );
            }
        }
    }
}
