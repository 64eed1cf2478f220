use log::{debug, warn};

use super::{
    locate_step, measure_response_with, AnalysisConfig, AnalysisError, ControlBranch,
    ResponseMeasurement,
};
use crate::trace::Trace;

/// Terminal state of the per-trace pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum TraceOutcome {
    /// Both phases succeeded
    Measured(ResponseMeasurement),
    /// Localization or aggregation failed; the trace is skipped
    Rejected(AnalysisError),
}

impl TraceOutcome {
    /// True for [`TraceOutcome::Measured`]
    pub fn is_measured(&self) -> bool {
        matches!(self, TraceOutcome::Measured(_))
    }

    /// Measurement, if the trace was measured
    pub fn measurement(&self) -> Option<&ResponseMeasurement> {
        match self {
            TraceOutcome::Measured(m) => Some(m),
            TraceOutcome::Rejected(_) => None,
        }
    }

    /// Rejection reason, if the trace was rejected
    pub fn rejection(&self) -> Option<&AnalysisError> {
        match self {
            TraceOutcome::Measured(_) => None,
            TraceOutcome::Rejected(e) => Some(e),
        }
    }
}

impl From<Result<ResponseMeasurement, AnalysisError>> for TraceOutcome {
    fn from(result: Result<ResponseMeasurement, AnalysisError>) -> Self {
        match result {
            Ok(m) => TraceOutcome::Measured(m),
            Err(e) => TraceOutcome::Rejected(e),
        }
    }
}

/// Runs Step Localization followed by Response Aggregation.
///
/// The extractor holds no mutable state, so one instance can be shared
/// across threads and reused for any number of traces.
#[derive(Debug, Clone)]
pub struct StepResponseExtractor {
    branch: ControlBranch,
    config: AnalysisConfig,
}

impl StepResponseExtractor {
    /// Create an extractor, rejecting invalid parameters up front
    pub fn new(branch: ControlBranch, config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { branch, config })
    }

    /// Create an extractor from a branch name such as `"neg"` or `"exp"`
    pub fn from_branch_name(branch: &str, config: AnalysisConfig) -> Result<Self, AnalysisError> {
        Self::new(branch.parse()?, config)
    }

    /// Branch applied to every trace
    pub fn branch(&self) -> ControlBranch {
        self.branch
    }

    /// Parameters applied to every trace
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Measure one trace, propagating the first failure
    pub fn extract(&self, trace: &Trace) -> Result<ResponseMeasurement, AnalysisError> {
        let label = trace.source().unwrap_or("<trace>");

        let step = locate_step(trace.control(), self.config.baseline_threshold)?;
        debug!(
            "{}: step onset {} offset {} (amplitude {} V)",
            label,
            step.onset_index(),
            step.offset_index(),
            step.step_amplitude()
        );

        let measurement = measure_response_with(trace, &step, self.branch, &self.config)?;
        debug!(
            "{}: baseline {:.3} pA, response {:.3} pA over [{}, {}), delta {:.3} pA",
            label,
            measurement.baseline_current(),
            measurement.response_current(),
            measurement.window().start,
            measurement.window().end,
            measurement.delta()
        );

        Ok(measurement)
    }

    /// Measure one trace and map the result onto its terminal state
    pub fn run(&self, trace: &Trace) -> TraceOutcome {
        let outcome = TraceOutcome::from(self.extract(trace));
        if let TraceOutcome::Rejected(e) = &outcome {
            warn!("{}: rejected: {}", trace.source().unwrap_or("<trace>"), e);
        }
        outcome
    }
}
