/// Errors returned when a trace violates its construction contract
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    /// The trace has no samples
    #[error("trace contains no samples")]
    Empty,

    /// A channel does not have the same length as the current channel
    #[error("channel '{channel}' has {actual} samples, expected {expected}")]
    LengthMismatch {
        /// Name of the offending channel
        channel: &'static str,
        /// Length of the current channel
        expected: usize,
        /// Length of the offending channel
        actual: usize,
    },

    /// Sample rate must be a positive integer
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,

    /// Timestamps decrease somewhere in the time axis
    #[error("time axis decreases at sample {index}")]
    NonMonotonicTime {
        /// First index whose timestamp is smaller than its predecessor
        index: usize,
    },

    /// A sample is NaN or infinite
    #[error("channel '{channel}' has a non-finite sample at index {index}")]
    NonFinite {
        /// Name of the offending channel
        channel: &'static str,
        /// Index of the first non-finite sample
        index: usize,
    },
}
