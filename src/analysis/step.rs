use serde::Serialize;

use super::{AnalysisError, StepEdge};

/// Onset and offset of the stimulus step on the control channel
///
/// Always satisfies `onset_index < offset_index < N`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepWindow {
    onset_index: usize,
    offset_index: usize,
    step_amplitude: f64,
}

impl StepWindow {
    /// First sample above the threshold
    pub fn onset_index(&self) -> usize {
        self.onset_index
    }

    /// First sample after onset that dropped out of the step band
    pub fn offset_index(&self) -> usize {
        self.offset_index
    }

    /// `control[onset] - control[0]`, rounded to the nearest integer volt.
    /// Informational only.
    pub fn step_amplitude(&self) -> f64 {
        self.step_amplitude
    }

    /// Step length in samples
    pub fn len(&self) -> usize {
        self.offset_index - self.onset_index
    }

    /// Always false: a located step spans at least one sample
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Step duration in seconds at the given sample rate
    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        self.len() as f64 / sample_rate as f64
    }
}

/// Locate the stimulus step on a control channel.
///
/// Onset is the first sample strictly above `baseline_threshold`, measured
/// against a nominal 0 V resting level. Offset is the first sample at or
/// after onset that falls below `control[onset] - baseline_threshold`, so
/// the offset band follows the level reached at onset rather than 0 V.
///
/// Thresholds are absolute. A transient crossing before the real step will
/// be reported as the onset; no noise-floor correction is attempted.
///
/// A negative or non-finite threshold is rejected with
/// [`AnalysisError::InvalidParameter`].
pub fn locate_step(control: &[f64], baseline_threshold: f64) -> Result<StepWindow, AnalysisError> {
    check_threshold(baseline_threshold)?;

    let onset_index = control
        .iter()
        .position(|&v| v > baseline_threshold)
        .ok_or(AnalysisError::NoStepDetected {
            edge: StepEdge::Onset,
            threshold: baseline_threshold,
        })?;

    let onset_level = control[onset_index];
    let step_amplitude = (onset_level - control[0]).round();

    let release_level = onset_level - baseline_threshold;
    let offset_index = control[onset_index..]
        .iter()
        .position(|&v| v < release_level)
        .map(|relative| relative + onset_index)
        .ok_or(AnalysisError::NoStepDetected {
            edge: StepEdge::Offset,
            threshold: baseline_threshold,
        })?;

    Ok(StepWindow {
        onset_index,
        offset_index,
        step_amplitude,
    })
}

/// A negative threshold would let the offset band contain the onset sample
pub(super) fn check_threshold(threshold: f64) -> Result<(), AnalysisError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(AnalysisError::InvalidParameter(format!(
            "baseline_threshold must be a finite non-negative voltage, got {}",
            threshold
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_pulse() {
        let control = [0.0, 0.0, 0.0, 0.2, 0.2, 0.2, 0.0, 0.0, 0.0];
        let step = locate_step(&control, 0.1).unwrap();

        assert_eq!(step.onset_index(), 3);
        assert_eq!(step.offset_index(), 6);
        assert_eq!(step.len(), 3);
        assert_eq!(step.step_amplitude(), 0.0);
    }

    #[test]
    fn test_amplitude_rounded() {
        let mut control = vec![0.02; 10];
        control[2..7].iter_mut().for_each(|v| *v = 4.8);
        let step = locate_step(&control, 0.1).unwrap();

        assert_eq!(step.step_amplitude(), 5.0);
        assert_eq!(step.duration_seconds(10), 0.5);
    }

    #[test]
    fn test_constant_signal_has_no_onset() {
        let err = locate_step(&[0.05; 32], 0.1).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::NoStepDetected {
                edge: StepEdge::Onset,
                threshold: 0.1,
            }
        );
    }

    #[test]
    fn test_constant_high_signal_has_no_offset() {
        let err = locate_step(&[5.0; 32], 0.1).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::NoStepDetected {
                edge: StepEdge::Offset,
                ..
            }
        ));
    }

    #[test]
    fn test_offset_relative_to_onset_level() {
        // Drops from 5 V to 4.95 V stay inside the band; 4.5 V leaves it.
        let control = [0.0, 5.0, 4.95, 4.95, 4.5, 0.0];
        let step = locate_step(&control, 0.1).unwrap();
        assert_eq!(step.offset_index(), 4);
    }

    #[test]
    fn test_offset_not_found_when_level_only_rises() {
        // Onset at the first rising sample; later samples never drop below it.
        let control = [0.0, 0.2, 1.0, 2.0, 3.0];
        assert!(locate_step(&control, 0.1).is_err());
    }

    #[test]
    fn test_transient_spike_gives_early_onset() {
        let control = [0.0, 0.3, 0.0, 0.0, 5.0, 5.0, 0.0];
        let step = locate_step(&control, 0.1).unwrap();
        assert_eq!(step.onset_index(), 1);
        assert_eq!(step.offset_index(), 2);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let control = [0.0, 0.0, 5.0, 5.0, 0.0];
        for threshold in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                locate_step(&control, threshold),
                Err(AnalysisError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_zero_threshold_keeps_offset_after_onset() {
        let step = locate_step(&[0.0, 0.0, 5.0, 5.0, 0.0], 0.0).unwrap();
        assert_eq!(step.onset_index(), 2);
        assert_eq!(step.offset_index(), 4);
        assert!(!step.is_empty());
    }

    #[test]
    fn test_empty_signal() {
        assert!(locate_step(&[], 0.1).is_err());
    }
}
