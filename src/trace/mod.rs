//! # Voltage-Clamp Trace
//!
//! A [`Trace`] is one recorded hold: the membrane current, the command
//! voltage, and the control channel that encodes when the stimulus (UV
//! pulse or drug step) was active, all sampled at a uniform rate.
//!
//! Traces are validated once at construction and are immutable afterwards.
//! Every analysis function takes them by shared reference.
//!
//! ## Invariants
//!
//! - All four sequences (`time`, `current`, `voltage`, `control`) share the
//!   same length N >= 1.
//! - The sample rate is a positive integer (samples per second).
//! - `time` is monotonically nondecreasing.
//! - Every sample is finite.

mod error;

#[cfg(test)]
mod tests;

pub use error::TraceError;

use serde::Serialize;

/// Channel names used in error messages and recording columns
pub mod channels {
    /// Time axis in seconds
    pub const TIME: &str = "time";
    /// Membrane current in pA
    pub const CURRENT: &str = "current";
    /// Command voltage in mV
    pub const VOLTAGE: &str = "voltage";
    /// Stimulus control channel in V
    pub const CONTROL: &str = "control";
}

/// One voltage-clamp hold recording
#[derive(Debug, Clone)]
pub struct Trace {
    time: Vec<f64>,
    current: Vec<f64>,
    voltage: Vec<f64>,
    control: Vec<f64>,
    sample_rate: u32,
    source: Option<String>,
}

impl Trace {
    /// Build a trace from explicit channels, validating every invariant
    pub fn new(
        time: Vec<f64>,
        current: Vec<f64>,
        voltage: Vec<f64>,
        control: Vec<f64>,
        sample_rate: u32,
    ) -> Result<Self, TraceError> {
        if current.is_empty() {
            return Err(TraceError::Empty);
        }
        if sample_rate == 0 {
            return Err(TraceError::InvalidSampleRate);
        }

        let expected = current.len();
        for (channel, values) in [
            (channels::TIME, &time),
            (channels::VOLTAGE, &voltage),
            (channels::CONTROL, &control),
        ] {
            if values.len() != expected {
                return Err(TraceError::LengthMismatch {
                    channel,
                    expected,
                    actual: values.len(),
                });
            }
        }

        for (channel, values) in [
            (channels::TIME, &time),
            (channels::CURRENT, &current),
            (channels::VOLTAGE, &voltage),
            (channels::CONTROL, &control),
        ] {
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(TraceError::NonFinite { channel, index });
            }
        }

        if let Some(index) = time.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(TraceError::NonMonotonicTime { index: index + 1 });
        }

        Ok(Self {
            time,
            current,
            voltage,
            control,
            sample_rate,
            source: None,
        })
    }

    /// Build a trace whose time axis is derived as `i / sample_rate`
    pub fn from_channels(
        current: Vec<f64>,
        voltage: Vec<f64>,
        control: Vec<f64>,
        sample_rate: u32,
    ) -> Result<Self, TraceError> {
        let time = derive_time_axis(current.len(), sample_rate);
        Self::new(time, current, voltage, control, sample_rate)
    }

    /// Attach a source label (usually the recording file name)
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Number of samples (N)
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Always false for a validated trace; provided for API symmetry
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Timestamps in seconds
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Membrane current in pA
    pub fn current(&self) -> &[f64] {
        &self.current
    }

    /// Command voltage
    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    /// Stimulus control channel in V
    pub fn control(&self) -> &[f64] {
        &self.control
    }

    /// Samples per second
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Source label, if one was attached
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Recording duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Compute an informational summary of the trace
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            source: self.source.clone(),
            sample_count: self.len(),
            sample_rate: self.sample_rate,
            duration_seconds: self.duration_seconds(),
            current: ChannelStats::of(&self.current),
            control: ChannelStats::of(&self.control),
        }
    }
}

/// Derive a uniform time axis for `len` samples
pub fn derive_time_axis(len: usize, sample_rate: u32) -> Vec<f64> {
    if sample_rate == 0 {
        return vec![0.0; len];
    }
    let rate = sample_rate as f64;
    (0..len).map(|i| i as f64 / rate).collect()
}

/// Minimum, maximum and mean of one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
}

impl ChannelStats {
    fn of(values: &[f64]) -> Self {
        let (min, max, sum) = values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
        );
        Self {
            min,
            max,
            mean: sum / values.len().max(1) as f64,
        }
    }
}

/// Informational summary used by `inspect`
#[derive(Debug, Clone, Serialize)]
pub struct TraceSummary {
    /// Source label
    pub source: Option<String>,
    /// Number of samples
    pub sample_count: usize,
    /// Samples per second
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Current channel statistics (pA)
    pub current: ChannelStats,
    /// Control channel statistics (V)
    pub control: ChannelStats,
}

impl std::fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(source) = &self.source {
            writeln!(f, "Source: {}", source)?;
        }
        writeln!(
            f,
            "Samples: {} @ {} Hz ({:.2} s)",
            self.sample_count, self.sample_rate, self.duration_seconds
        )?;
        writeln!(
            f,
            "Current (pA): min {:.3}, max {:.3}, mean {:.3}",
            self.current.min, self.current.max, self.current.mean
        )?;
        write!(
            f,
            "Control (V): min {:.3}, max {:.3}, mean {:.3}",
            self.control.min, self.control.max, self.control.mean
        )
    }
}
