//! # Step Response Analysis
//!
//! Turns one [`Trace`](crate::trace::Trace) into a [`ResponseMeasurement`]
//! in two phases:
//!
//! 1. **Step Localization** ([`locate_step`]) finds where the control
//!    channel rises above an absolute threshold and where it falls back out
//!    of the band reached at onset.
//! 2. **Response Aggregation** ([`measure_response_with`]) averages a fixed
//!    baseline prefix and a response window whose placement depends on the
//!    [`ControlBranch`], then reports their difference.
//!
//! ```rust
//! use stepclamp::analysis::{AnalysisConfig, ControlBranch, StepResponseExtractor};
//! use stepclamp::trace::Trace;
//!
//! let n = 40;
//! let control: Vec<f64> = (0..n).map(|i| if (10..20).contains(&i) { 5.0 } else { 0.0 }).collect();
//! let current: Vec<f64> = (0..n).map(|i| if i >= 15 { -120.0 } else { -20.0 }).collect();
//! let trace = Trace::from_channels(current, vec![-60.0; n], control, 1)?;
//!
//! let config = AnalysisConfig {
//!     baseline_window_samples: 10,
//!     ..Default::default()
//! };
//! let extractor = StepResponseExtractor::new(ControlBranch::Experimental, config)?;
//! let m = extractor.extract(&trace)?;
//! assert_eq!(m.baseline_current(), -20.0);
//! assert_eq!(m.window().start, 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## State machine
//!
//! ```text
//! Trace -> locate_step -> StepWindow -> measure_response(branch) -> Measured
//!              |                              |
//!              +------------> Rejected <------+
//! ```
//!
//! Failures are deterministic and never retried.

mod branch;
mod config;
mod error;
mod extractor;
mod response;
mod step;


pub use branch::ControlBranch;
pub use config::{
    AnalysisConfig, DEFAULT_BASELINE_THRESHOLD, DEFAULT_BASELINE_WINDOW_SAMPLES,
    DEFAULT_POST_WINDOW_SECONDS, DEFAULT_PRE_WINDOW_SECONDS,
};
pub use error::{AnalysisError, StepEdge};
pub use extractor::{StepResponseExtractor, TraceOutcome};
pub use response::{
    argmin, baseline_current, mean, measure_response, measure_response_with,
    select_response_window, ResponseMeasurement, ResponseWindow, WindowAnchor,
};
pub use step::{locate_step, StepWindow};
