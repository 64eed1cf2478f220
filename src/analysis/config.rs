use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// Default onset threshold on the control channel, in volts
pub const DEFAULT_BASELINE_THRESHOLD: f64 = 0.1;

/// Default length of the baseline prefix, in samples (3 s at 10 kHz)
pub const DEFAULT_BASELINE_WINDOW_SAMPLES: usize = 30_000;

/// Default response window extent before the anchor, in seconds
pub const DEFAULT_PRE_WINDOW_SECONDS: f64 = 10.0;

/// Default response window extent after the anchor, in seconds
pub const DEFAULT_POST_WINDOW_SECONDS: f64 = 20.0;

/// Parameters for Step Localization and Response Aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Absolute control-channel threshold for onset and offset detection (V)
    pub baseline_threshold: f64,

    /// Number of leading samples averaged into the baseline current
    pub baseline_window_samples: usize,

    /// Reject traces shorter than `baseline_window_samples` instead of
    /// averaging over the shorter prefix
    pub require_full_baseline: bool,

    /// Seconds of response window before the anchor
    pub pre_window_seconds: f64,

    /// Seconds of response window after the anchor
    pub post_window_seconds: f64,

    /// Explicit `[start, end)` response window, used instead of automatic
    /// placement for any branch
    pub manual_window: Option<(usize, usize)>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            baseline_threshold: DEFAULT_BASELINE_THRESHOLD,
            baseline_window_samples: DEFAULT_BASELINE_WINDOW_SAMPLES,
            require_full_baseline: false,
            pre_window_seconds: DEFAULT_PRE_WINDOW_SECONDS,
            post_window_seconds: DEFAULT_POST_WINDOW_SECONDS,
            manual_window: None,
        }
    }
}

impl AnalysisConfig {
    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<(), AnalysisError> {
        super::step::check_threshold(self.baseline_threshold)?;

        for (name, seconds) in [
            ("pre_window_seconds", self.pre_window_seconds),
            ("post_window_seconds", self.post_window_seconds),
        ] {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(AnalysisError::InvalidParameter(format!(
                    "{name} must be finite and >= 0, got {seconds}"
                )));
            }
        }

        Ok(())
    }

    /// Response window extent before the anchor, in samples
    pub fn pre_window_samples(&self, sample_rate: u32) -> i64 {
        seconds_to_samples(self.pre_window_seconds, sample_rate)
    }

    /// Response window extent after the anchor, in samples
    pub fn post_window_samples(&self, sample_rate: u32) -> i64 {
        seconds_to_samples(self.post_window_seconds, sample_rate)
    }
}

fn seconds_to_samples(seconds: f64, sample_rate: u32) -> i64 {
    (seconds * sample_rate as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.baseline_threshold, 0.1);
        assert_eq!(config.baseline_window_samples, 30_000);
        assert_eq!(config.pre_window_samples(10_000), 100_000);
        assert_eq!(config.post_window_samples(10_000), 200_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = AnalysisConfig {
            baseline_threshold: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_non_finite_window_rejected() {
        let config = AnalysisConfig {
            post_window_seconds: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: AnalysisConfig = toml::from_str("pre_window_seconds = 5.0").unwrap();
        assert_eq!(config.pre_window_seconds, 5.0);
        assert_eq!(config.post_window_seconds, 20.0);
        assert_eq!(config.manual_window, None);
    }
}
