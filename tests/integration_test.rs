//! Integration tests for stepclamp
//!
//! These tests run the full pipeline: recordings on disk in a cell folder,
//! batch measurement, results table and run summary.

use std::fs;
use std::path::Path;

use stepclamp::analysis::{
    AnalysisConfig, AnalysisError, ControlBranch, StepEdge, StepResponseExtractor, WindowAnchor,
};
use stepclamp::batch::BatchAnalyzer;
use stepclamp::export::{read_rows, MeasurementWriter, RunSummary};
use stepclamp::recording::{load_trace, write_trace_parquet, CellFolder, ExperimentKind};
use stepclamp::trace::Trace;
use tempfile::tempdir;

const RATE: u32 = 1000;

/// 60 s at 1 kHz: control step 35-40 s, inward current -140 pA from 38 s to 50 s
fn uv_hold(with_step: bool) -> Trace {
    let n = 60 * RATE as usize;
    let control = (0..n)
        .map(|i| {
            if with_step && (35_000..40_000).contains(&i) {
                5.0
            } else {
                0.0
            }
        })
        .collect();
    let current = (0..n)
        .map(|i| if (38_000..50_000).contains(&i) { -140.0 } else { -40.0 })
        .collect();
    Trace::from_channels(current, vec![-60.0; n], control, RATE).unwrap()
}

fn write_cell(root: &Path, kind: ExperimentKind) -> CellFolder {
    let cell = CellFolder::new(root);
    let holds = cell.hold_folder(kind);
    fs::create_dir_all(&holds).unwrap();
    write_trace_parquet(holds.join("hold_0001.parquet"), &uv_hold(true)).unwrap();
    write_trace_parquet(holds.join("hold_0002.parquet"), &uv_hold(false)).unwrap();
    cell
}

fn extractor(branch: ControlBranch) -> StepResponseExtractor {
    StepResponseExtractor::new(branch, AnalysisConfig::default()).unwrap()
}

/// Default parameters on a 1 kHz recording: 30 s baseline, window of
/// 10 s before and 20 s after the anchor
#[test]
fn test_experimental_measurement_with_defaults() {
    let m = extractor(ControlBranch::Experimental)
        .extract(&uv_hold(true))
        .unwrap();

    assert_eq!(m.step().onset_index(), 35_000);
    assert_eq!(m.step().offset_index(), 40_000);
    assert_eq!(m.step().step_amplitude(), 5.0);
    assert_eq!(m.baseline_current(), -40.0);
    assert_eq!(m.baseline_samples(), 30_000);

    let window = m.window();
    assert_eq!(window.anchor, WindowAnchor::CurrentMinimum { index: 38_000 });
    assert_eq!((window.start, window.end), (28_000, 58_000));

    // 10 000 x -40, 12 000 x -140, 8 000 x -40
    assert_eq!(m.response_current(), -80.0);
    assert_eq!(m.delta(), -40.0);
}

#[test]
fn test_negative_control_window_is_clipped() {
    let m = extractor(ControlBranch::NegativeControl)
        .extract(&uv_hold(true))
        .unwrap();

    let window = m.window();
    assert_eq!(window.anchor, WindowAnchor::StepOffset { index: 40_000 });
    // 40 000 + 20 000 lands exactly on the trace end.
    assert_eq!((window.start, window.end), (30_000, 60_000));
    assert_eq!(m.response_current(), -80.0);
}

#[test]
fn test_cell_pipeline_end_to_end() {
    let dir = tempdir().unwrap();
    let cell = write_cell(&dir.path().join("cs4_cell1"), ExperimentKind::Uv);

    let batch = BatchAnalyzer::new(extractor(ControlBranch::Experimental));
    let report = batch.analyze_cell(&cell, ExperimentKind::Uv).unwrap();
    assert_eq!(report.measured_count(), 1);
    assert_eq!(report.rejected_count(), 1);

    let output = cell.default_output_path(ExperimentKind::Uv);
    assert!(output.ends_with("analysedData/holding_current_values_UV_pA.csv"));
    fs::create_dir_all(output.parent().unwrap()).unwrap();

    let mut writer = MeasurementWriter::create(&output).unwrap();
    for row in report.rows() {
        writer.write_row(&row).unwrap();
    }
    assert_eq!(writer.finish().unwrap(), 1);

    let rows = read_rows(&output).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].folder, "cs4_cell1");
    assert_eq!(rows[0].filename, "hold_0001.parquet");
    assert_eq!(rows[0].steady_state_current, -40.0);
    assert_eq!(rows[0].end_current, -80.0);
    assert_eq!(rows[0].diff, -40.0);

    let summary_path = RunSummary::sidecar_path(&output);
    report
        .to_summary(batch.extractor().config().clone())
        .write_to(&summary_path)
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(json["folder"], "cs4_cell1");
    assert_eq!(json["branch"], "experimental");
    let records = json["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["status"], "measured");
    assert_eq!(records[1]["status"], "rejected");
}

#[test]
fn test_append_accumulates_rows_across_cells() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("all_cells.csv");
    let batch = BatchAnalyzer::new(extractor(ControlBranch::Experimental));

    for name in ["cs1_cell1", "cs1_cell2"] {
        let cell = write_cell(&dir.path().join(name), ExperimentKind::Drug);
        let report = batch.analyze_cell(&cell, ExperimentKind::Drug).unwrap();

        let mut writer = MeasurementWriter::append(&output).unwrap();
        for row in report.rows() {
            writer.write_row(&row).unwrap();
        }
        writer.finish().unwrap();
    }

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.matches("steadyStateCurrent").count(), 1);

    let rows = read_rows(&output).unwrap();
    let folders: Vec<_> = rows.iter().map(|r| r.folder.as_str()).collect();
    assert_eq!(folders, vec!["cs1_cell1", "cs1_cell2"]);
}

#[test]
fn test_csv_recording_with_units_and_inferred_rate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hold_0001.csv");

    let mut body = String::from("Time (s),Current (pA),Voltage (mV),Control (V)\n");
    for i in 0..300 {
        let control = if (100..150).contains(&i) { 5.0 } else { 0.0 };
        let current = if (120..180).contains(&i) { -90.0 } else { -30.0 };
        body.push_str(&format!("{},{},-60,{}\n", i as f64 / 100.0, current, control));
    }
    fs::write(&path, body).unwrap();

    let trace = load_trace(&path, None).unwrap();
    assert_eq!(trace.sample_rate(), 100);
    assert_eq!(trace.len(), 300);
    assert_eq!(trace.source(), Some("hold_0001.csv"));

    let config = AnalysisConfig {
        baseline_window_samples: 100,
        pre_window_seconds: 0.0,
        post_window_seconds: 0.5,
        ..Default::default()
    };
    let m = StepResponseExtractor::new(ControlBranch::Experimental, config)
        .unwrap()
        .extract(&trace)
        .unwrap();

    assert_eq!((m.window().start, m.window().end), (120, 170));
    assert_eq!(m.baseline_current(), -30.0);
    assert_eq!(m.delta(), -60.0);
}

#[test]
fn test_flat_recording_reports_missing_onset() {
    let result = extractor(ControlBranch::NegativeControl).extract(&uv_hold(false));
    assert_eq!(
        result.unwrap_err(),
        AnalysisError::NoStepDetected {
            edge: StepEdge::Onset,
            threshold: 0.1,
        }
    );
}

#[test]
fn test_manual_window_overrides_both_branches() {
    let config = AnalysisConfig {
        manual_window: Some((40_000, 45_000)),
        ..Default::default()
    };

    for branch in [ControlBranch::NegativeControl, ControlBranch::Experimental] {
        let m = StepResponseExtractor::new(branch, config.clone())
            .unwrap()
            .extract(&uv_hold(true))
            .unwrap();
        assert_eq!(m.window().anchor, WindowAnchor::Manual);
        assert_eq!(m.response_current(), -140.0);
        assert_eq!(m.delta(), -100.0);
    }
}
