use super::*;

fn flat(len: usize, value: f64) -> Vec<f64> {
    vec![value; len]
}

#[test]
fn test_from_channels_derives_time_axis() {
    let trace = Trace::from_channels(flat(4, 1.0), flat(4, -60.0), flat(4, 0.0), 2).unwrap();

    assert_eq!(trace.len(), 4);
    assert_eq!(trace.time(), &[0.0, 0.5, 1.0, 1.5]);
    assert_eq!(trace.duration_seconds(), 2.0);
}

#[test]
fn test_empty_trace_rejected() {
    let err = Trace::from_channels(vec![], vec![], vec![], 10_000).unwrap_err();
    assert_eq!(err, TraceError::Empty);
}

#[test]
fn test_zero_sample_rate_rejected() {
    let err = Trace::new(flat(3, 0.0), flat(3, 0.0), flat(3, 0.0), flat(3, 0.0), 0).unwrap_err();
    assert_eq!(err, TraceError::InvalidSampleRate);
}

#[test]
fn test_length_mismatch_names_channel() {
    let err = Trace::from_channels(flat(5, 0.0), flat(5, 0.0), flat(4, 0.0), 100).unwrap_err();
    assert_eq!(
        err,
        TraceError::LengthMismatch {
            channel: channels::CONTROL,
            expected: 5,
            actual: 4,
        }
    );
}

#[test]
fn test_non_monotonic_time_rejected() {
    let time = vec![0.0, 0.1, 0.05, 0.2];
    let err = Trace::new(time, flat(4, 0.0), flat(4, 0.0), flat(4, 0.0), 10).unwrap_err();
    assert_eq!(err, TraceError::NonMonotonicTime { index: 2 });
}

#[test]
fn test_repeated_timestamps_allowed() {
    let time = vec![0.0, 0.0, 0.1, 0.1];
    assert!(Trace::new(time, flat(4, 0.0), flat(4, 0.0), flat(4, 0.0), 10).is_ok());
}

#[test]
fn test_non_finite_sample_rejected() {
    let mut current = flat(6, -20.0);
    current[4] = f64::NAN;
    let err = Trace::from_channels(current, flat(6, 0.0), flat(6, 0.0), 10).unwrap_err();
    assert_eq!(
        err,
        TraceError::NonFinite {
            channel: channels::CURRENT,
            index: 4,
        }
    );
}

#[test]
fn test_summary_statistics() {
    let current = vec![-10.0, -30.0, -20.0, 0.0];
    let control = vec![0.0, 5.0, 5.0, 0.0];
    let trace = Trace::from_channels(current, flat(4, -60.0), control, 4)
        .unwrap()
        .with_source("cell1.parquet");

    let summary = trace.summary();
    assert_eq!(summary.source.as_deref(), Some("cell1.parquet"));
    assert_eq!(summary.sample_count, 4);
    assert_eq!(summary.current.min, -30.0);
    assert_eq!(summary.current.max, 0.0);
    assert_eq!(summary.current.mean, -15.0);
    assert_eq!(summary.control.max, 5.0);
    assert!(summary.to_string().contains("Samples: 4 @ 4 Hz"));
}
