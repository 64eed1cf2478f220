use super::*;
use std::io::Cursor;
use std::str::FromStr;
use tempfile::tempdir;

fn pulse_trace(n: usize, sample_rate: u32) -> Trace {
    let control = (0..n)
        .map(|i| if (n / 4..n / 2).contains(&i) { 5.0 } else { 0.0 })
        .collect();
    let current = (0..n).map(|i| -20.0 - (i % 7) as f64).collect();
    Trace::from_channels(current, vec![-60.0; n], control, sample_rate).unwrap()
}

#[test]
fn test_parquet_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hold_000.parquet");
    let trace = pulse_trace(1_000, 100).with_source("2023_12_14_0001.abf");

    write_trace_parquet(&path, &trace).unwrap();
    let restored = read_trace_parquet(&path, None).unwrap();

    assert_eq!(restored.sample_rate(), 100);
    assert_eq!(restored.current(), trace.current());
    assert_eq!(restored.control(), trace.control());
    assert_eq!(restored.time(), trace.time());
    assert_eq!(restored.source(), Some("2023_12_14_0001.abf"));
}

#[test]
fn test_parquet_rate_override() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hold.parquet");
    write_trace_parquet(&path, &pulse_trace(50, 10)).unwrap();

    let restored = read_trace_parquet(&path, Some(20)).unwrap();
    assert_eq!(restored.sample_rate(), 20);
}

#[test]
fn test_load_trace_labels_with_file_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hold_001.parquet");
    write_trace_parquet(&path, &pulse_trace(50, 10).with_source("original.abf")).unwrap();

    let trace = load_trace(&path, None).unwrap();
    assert_eq!(trace.source(), Some("hold_001.parquet"));
}

#[test]
fn test_csv_with_units_and_time() {
    let data = "time (s),current (pA),voltage (mV),control [V]\n\
                0.0,-10.0,-60,0.0\n\
                0.1,-11.0,-60,5.0\n\
                0.2,-12.0,-60,5.0\n\
                0.3,-13.0,-60,0.0\n";
    let trace = read_trace_delimited(Cursor::new(data), b',', None).unwrap();

    assert_eq!(trace.len(), 4);
    assert_eq!(trace.sample_rate(), 10);
    assert_eq!(trace.current(), &[-10.0, -11.0, -12.0, -13.0]);
    assert_eq!(trace.control()[1], 5.0);
}

#[test]
fn test_tsv_without_time_needs_rate() {
    let data = "current\tvoltage\tcontrol\n-1\t-60\t0\n-2\t-60\t1\n";

    let err = read_trace_delimited(Cursor::new(data), b'\t', None).unwrap_err();
    assert!(matches!(err, RecordingError::MissingSampleRate(_)));

    let trace = read_trace_delimited(Cursor::new(data), b'\t', Some(4)).unwrap();
    assert_eq!(trace.time(), &[0.0, 0.25]);
}

#[test]
fn test_csv_missing_column() {
    let data = "time,current,voltage\n0,1,2\n";
    let err = read_trace_delimited(Cursor::new(data), b',', None).unwrap_err();
    assert!(matches!(err, RecordingError::ColumnNotFound(ref c) if c == "control"));
}

#[test]
fn test_csv_bad_number() {
    let data = "current,voltage,control\n-1,-60,zero\n";
    let err = read_trace_delimited(Cursor::new(data), b',', Some(10)).unwrap_err();
    assert!(matches!(err, RecordingError::InvalidFormat(_)));
}

#[test]
fn test_csv_empty_body_is_invalid_trace() {
    let data = "current,voltage,control\n";
    let err = read_trace_delimited(Cursor::new(data), b',', Some(10)).unwrap_err();
    assert!(matches!(err, RecordingError::Trace(crate::trace::TraceError::Empty)));
}

#[test]
fn test_infer_sample_rate_uses_median() {
    let time = [0.0, 0.0001, 0.0002, 0.0003, 0.5];
    assert_eq!(infer_sample_rate(&time).unwrap(), 10_000);
    assert!(infer_sample_rate(&[0.0]).is_err());
    assert!(infer_sample_rate(&[1.0, 1.0, 1.0]).is_err());
}

#[test]
fn test_recording_format_from_path() {
    assert_eq!(
        RecordingFormat::from_path(Path::new("a/b.PARQUET")).unwrap(),
        RecordingFormat::Parquet
    );
    assert_eq!(
        RecordingFormat::from_path(Path::new("b.txt")).unwrap(),
        RecordingFormat::Tsv
    );
    assert!(RecordingFormat::from_path(Path::new("b.abf")).is_err());
}

#[test]
fn test_cell_folder_layout() {
    let dir = tempdir().unwrap();
    let cell = CellFolder::new(dir.path());
    let holds = cell.hold_folder(ExperimentKind::Uv);
    std::fs::create_dir_all(&holds).unwrap();

    write_trace_parquet(holds.join("b.parquet"), &pulse_trace(20, 10)).unwrap();
    write_trace_parquet(holds.join("a.parquet"), &pulse_trace(20, 10)).unwrap();
    std::fs::write(holds.join("notes.md"), "ignored").unwrap();

    let recordings = cell.recordings(ExperimentKind::Uv).unwrap();
    let names: Vec<_> = recordings
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.parquet", "b.parquet"]);

    assert!(matches!(
        cell.recordings(ExperimentKind::Drug),
        Err(RecordingError::MissingHoldFolder(_))
    ));
    assert!(cell
        .default_output_path(ExperimentKind::Drug)
        .ends_with("analysedData/holding_current_values_drug_pA.csv"));
}

#[test]
fn test_experiment_kind_parsing() {
    assert_eq!(ExperimentKind::from_str("UV").unwrap(), ExperimentKind::Uv);
    assert_eq!(ExperimentKind::from_str("drug").unwrap(), ExperimentKind::Drug);
    assert!(ExperimentKind::from_str("light").is_err());
    assert_eq!(ExperimentKind::Uv.hold_folder_name(), "holds_UV");
}
