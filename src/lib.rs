//! # stepclamp - Step Response Extraction for Voltage-Clamp Holds
//!
//! `stepclamp` measures how much a cell's holding current changes in
//! response to an experimentally delivered step (a UV light pulse or a drug
//! addition) in whole-cell voltage-clamp recordings.
//!
//! For each recording it:
//!
//! 1. locates the step onset and offset on the control channel;
//! 2. averages a fixed-length baseline prefix of the current;
//! 3. averages the current over a response window placed by the
//!    [`ControlBranch`](analysis::ControlBranch) policy;
//! 4. reports `response - baseline` as the effect size.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stepclamp::analysis::{AnalysisConfig, ControlBranch, StepResponseExtractor};
//! use stepclamp::recording::load_trace;
//!
//! let trace = load_trace("cs4_cell1/holds_UV/hold_0001.parquet", None)?;
//! let extractor = StepResponseExtractor::new(ControlBranch::Experimental, AnalysisConfig::default())?;
//! let m = extractor.extract(&trace)?;
//! println!(
//!     "baseline {:.1} pA, response {:.1} pA, diff {:.1} pA",
//!     m.baseline_current(),
//!     m.response_current(),
//!     m.delta()
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Batch Analysis
//!
//! ```rust,no_run
//! use stepclamp::analysis::{AnalysisConfig, ControlBranch, StepResponseExtractor};
//! use stepclamp::batch::BatchAnalyzer;
//! use stepclamp::export::MeasurementWriter;
//! use stepclamp::recording::{CellFolder, ExperimentKind};
//!
//! let cell = CellFolder::new("cs4_cell1");
//! let extractor = StepResponseExtractor::new(ControlBranch::NegativeControl, AnalysisConfig::default())?;
//! let report = BatchAnalyzer::new(extractor).analyze_cell(&cell, ExperimentKind::Uv)?;
//!
//! let mut writer = MeasurementWriter::create(cell.default_output_path(ExperimentKind::Uv))?;
//! for row in report.rows() {
//!     writer.write_row(&row)?;
//! }
//! writer.finish()?;
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`trace`]: validated, immutable recording channels
//! - [`analysis`]: Step Localization and Response Aggregation
//! - [`recording`]: Parquet/CSV adapters and the cell-folder layout
//! - [`export`]: output row schema, CSV writer, JSON run summary
//! - [`batch`]: per-folder runner with skip-and-report semantics
//! - `plot` (feature `plots`): diagnostic PNGs for manual review
//!
//! ## Known Limitations
//!
//! Thresholds on the control channel are absolute. A noisy control channel
//! that briefly crosses the threshold before the real step yields an early
//! onset. The baseline prefix is a fixed sample count, so its duration
//! depends on the acquisition rate.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod batch;
pub mod export;
pub mod recording;
pub mod trace;

#[cfg(feature = "plots")]
pub mod plot;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::analysis::{
        locate_step, measure_response, measure_response_with, AnalysisConfig, AnalysisError,
        ControlBranch, ResponseMeasurement, ResponseWindow, StepResponseExtractor, StepWindow,
        TraceOutcome, WindowAnchor,
    };
    pub use crate::batch::{BatchAnalyzer, BatchEntry, BatchRejection, BatchReport};
    pub use crate::export::{read_rows, MeasurementRow, MeasurementWriter, RunSummary};
    pub use crate::recording::{load_trace, CellFolder, ExperimentKind, RecordingError};
    pub use crate::trace::{Trace, TraceError, TraceSummary};
}
