use std::fmt;

/// Which edge of the step could not be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEdge {
    /// Control channel never rose above the threshold
    Onset,
    /// Control channel never fell back below the onset band
    Offset,
}

impl fmt::Display for StepEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepEdge::Onset => write!(f, "onset"),
            StepEdge::Offset => write!(f, "offset"),
        }
    }
}

/// Errors that reject a single trace during analysis
///
/// None of these are retried: each is deterministic for a given trace and
/// parameter set. Batch callers record them and move on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The control channel never crossed the onset or offset threshold
    #[error("no step detected: control channel has no {edge} at threshold {threshold} V")]
    NoStepDetected {
        /// Edge that was not found
        edge: StepEdge,
        /// Threshold used for the search
        threshold: f64,
    },

    /// Not enough samples to form the baseline prefix
    #[error("insufficient samples for baseline: need {required}, trace has {available}")]
    InsufficientSamples {
        /// Samples required
        required: usize,
        /// Samples available
        available: usize,
    },

    /// The response window is empty after clipping to the trace
    #[error("response window [{start}, {end}) is empty within a trace of {len} samples")]
    EmptyWindow {
        /// Requested start index (before clipping)
        start: i64,
        /// Requested end index (before clipping)
        end: i64,
        /// Trace length
        len: usize,
    },

    /// The branch name is neither a negative control nor an experiment
    #[error("unknown control branch '{0}': expected 'neg' or 'exp'")]
    UnknownBranch(String),

    /// An analysis parameter is out of range
    #[error("invalid analysis parameter: {0}")]
    InvalidParameter(String),
}
