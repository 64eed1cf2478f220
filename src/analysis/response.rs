use serde::Serialize;

use super::{AnalysisConfig, AnalysisError, ControlBranch, StepWindow};
use crate::trace::Trace;

/// Sample the response window was positioned around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowAnchor {
    /// Step offset (negative-control policy)
    StepOffset {
        /// Offset index
        index: usize,
    },
    /// Global minimum of the current (experimental policy)
    CurrentMinimum {
        /// Index of the first minimum
        index: usize,
    },
    /// Window supplied by the caller
    Manual,
}

/// Clipped `[start, end)` slice of the trace used for the response current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseWindow {
    /// First index (inclusive)
    pub start: usize,
    /// Last index (exclusive)
    pub end: usize,
    /// What the window was positioned around
    pub anchor: WindowAnchor,
}

impl ResponseWindow {
    /// Number of samples in the window
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Never true for a window returned by [`select_response_window`]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Result of Response Aggregation for one trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseMeasurement {
    branch: ControlBranch,
    step: StepWindow,
    baseline_current: f64,
    baseline_samples: usize,
    response_current: f64,
    delta: f64,
    window: ResponseWindow,
}

impl ResponseMeasurement {
    /// Branch whose windowing policy was applied
    pub fn branch(&self) -> ControlBranch {
        self.branch
    }

    /// Step located on the control channel
    pub fn step(&self) -> &StepWindow {
        &self.step
    }

    /// Mean current over the baseline prefix (pA)
    pub fn baseline_current(&self) -> f64 {
        self.baseline_current
    }

    /// Number of samples averaged into the baseline
    pub fn baseline_samples(&self) -> usize {
        self.baseline_samples
    }

    /// Mean current over the response window (pA)
    pub fn response_current(&self) -> f64 {
        self.response_current
    }

    /// `response_current - baseline_current` (pA)
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Window used for the response current
    pub fn window(&self) -> &ResponseWindow {
        &self.window
    }
}

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Index of the first minimum; `None` for an empty slice
pub fn argmin(values: &[f64]) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut best_index, mut best_value) = iter.next().map(|(i, &v)| (i, v))?;
    for (i, &v) in iter {
        if v < best_value {
            best_index = i;
            best_value = v;
        }
    }
    Some(best_index)
}

/// Mean of the leading `window_samples` current samples.
///
/// The prefix is clipped to the trace unless `require_full` is set, in
/// which case a short trace is rejected. Returns the mean together with
/// the number of samples it covers.
pub fn baseline_current(
    current: &[f64],
    window_samples: usize,
    require_full: bool,
) -> Result<(f64, usize), AnalysisError> {
    let insufficient = AnalysisError::InsufficientSamples {
        required: window_samples.max(1),
        available: current.len(),
    };

    if window_samples == 0 || (require_full && current.len() < window_samples) {
        return Err(insufficient);
    }

    let prefix = &current[..window_samples.min(current.len())];
    mean(prefix)
        .map(|value| (value, prefix.len()))
        .ok_or(insufficient)
}

/// Clip `[anchor - pre, anchor + post)` to `[0, len)`
fn clip_window(anchor: i64, pre: i64, post: i64, len: usize) -> Result<(usize, usize), AnalysisError> {
    clip_range(anchor.saturating_sub(pre), anchor.saturating_add(post), len)
}

/// Indices past `i64::MAX` are beyond any trace; saturate before clipping
fn to_i64(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

fn clip_range(start: i64, end: i64, len: usize) -> Result<(usize, usize), AnalysisError> {
    let upper = to_i64(len);
    let clipped_start = start.clamp(0, upper);
    let clipped_end = end.clamp(0, upper);

    if clipped_start >= clipped_end {
        return Err(AnalysisError::EmptyWindow { start, end, len });
    }

    Ok((clipped_start as usize, clipped_end as usize))
}

/// Choose the response window for a trace.
///
/// A manual window in `config` takes precedence over either branch policy.
/// Otherwise the negative control anchors on the step offset and the
/// experimental branch anchors on the first global minimum of the current.
pub fn select_response_window(
    trace: &Trace,
    step: &StepWindow,
    branch: ControlBranch,
    config: &AnalysisConfig,
) -> Result<ResponseWindow, AnalysisError> {
    let len = trace.len();

    if let Some((start, end)) = config.manual_window {
        let (start, end) = clip_range(to_i64(start), to_i64(end), len)?;
        return Ok(ResponseWindow {
            start,
            end,
            anchor: WindowAnchor::Manual,
        });
    }

    let (anchor, anchor_index) = match branch {
        ControlBranch::NegativeControl => {
            let index = step.offset_index();
            (WindowAnchor::StepOffset { index }, index)
        }
        ControlBranch::Experimental => {
            let index = argmin(trace.current()).ok_or(AnalysisError::InsufficientSamples {
                required: 1,
                available: 0,
            })?;
            (WindowAnchor::CurrentMinimum { index }, index)
        }
    };

    let (start, end) = clip_window(
        to_i64(anchor_index),
        config.pre_window_samples(trace.sample_rate()),
        config.post_window_samples(trace.sample_rate()),
        len,
    )?;

    Ok(ResponseWindow { start, end, anchor })
}

/// Measure the response with the default window parameters
pub fn measure_response(
    trace: &Trace,
    step: &StepWindow,
    branch: ControlBranch,
) -> Result<ResponseMeasurement, AnalysisError> {
    measure_response_with(trace, step, branch, &AnalysisConfig::default())
}

/// Measure baseline and response currents for a located step.
///
/// The baseline does not depend on the branch; only the response window
/// does. `delta` is the plain difference of the two means.
pub fn measure_response_with(
    trace: &Trace,
    step: &StepWindow,
    branch: ControlBranch,
    config: &AnalysisConfig,
) -> Result<ResponseMeasurement, AnalysisError> {
    let (baseline_current, baseline_samples) = baseline_current(
        trace.current(),
        config.baseline_window_samples,
        config.require_full_baseline,
    )?;

    let window = select_response_window(trace, step, branch, config)?;
    let response_current = mean(&trace.current()[window.start..window.end]).ok_or(
        AnalysisError::EmptyWindow {
            start: window.start as i64,
            end: window.end as i64,
            len: trace.len(),
        },
    )?;

    Ok(ResponseMeasurement {
        branch,
        step: *step,
        baseline_current,
        baseline_samples,
        response_current,
        delta: response_current - baseline_current,
        window,
    })
}
