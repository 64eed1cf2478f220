use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use stepclamp::recording::{write_trace_parquet, CellFolder, ExperimentKind};
use stepclamp::trace::Trace;

const RECORDING_SECONDS: f64 = 120.0;
const HOLDING_CURRENT_PA: f64 = -50.0;
const HOLDING_POTENTIAL_MV: f64 = -60.0;
const STEP_VOLTS: f64 = 5.0;

/// Shape of one synthetic hold recording
struct MockHold {
    name: &'static str,
    /// Stimulus start and end in seconds; `None` end keeps the stimulus on
    stimulus: (f64, Option<f64>),
    /// Peak inward current in pA
    response_amplitude: f64,
    /// Time to peak in seconds
    response_tau: f64,
}

const UV_HOLDS: &[MockHold] = &[
    MockHold {
        name: "hold_0001",
        stimulus: (40.0, Some(45.0)),
        response_amplitude: 120.0,
        response_tau: 8.0,
    },
    MockHold {
        name: "hold_0002",
        stimulus: (40.0, Some(45.0)),
        response_amplitude: 0.0,
        response_tau: 8.0,
    },
    // Stimulus never switches off: rejected with no step offset.
    MockHold {
        name: "hold_0003",
        stimulus: (40.0, None),
        response_amplitude: 80.0,
        response_tau: 8.0,
    },
];

const DRUG_HOLDS: &[MockHold] = &[MockHold {
    name: "hold_0001",
    stimulus: (50.0, Some(100.0)),
    response_amplitude: 300.0,
    response_tau: 15.0,
}];

/// Generate a synthetic cell folder with UV and drug hold recordings
pub fn run(output: PathBuf, sample_rate: u32) -> Result<()> {
    info!("stepclamp - Demo Cell Folder");
    info!("============================");

    let cell = CellFolder::new(&output);
    let mut written = 0;

    for (kind, holds) in [
        (ExperimentKind::Uv, UV_HOLDS),
        (ExperimentKind::Drug, DRUG_HOLDS),
    ] {
        let folder = cell.hold_folder(kind);
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create {}", folder.display()))?;

        for hold in holds {
            let trace = generate_mock_hold(hold, sample_rate)?;
            let path = folder.join(format!("{}.parquet", hold.name));
            write_trace_parquet(&path, &trace)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("  {} ({} samples)", path.display(), trace.len());
            written += 1;
        }
    }

    println!(
        "Created {} recording(s) in {}",
        written,
        cell.root().display()
    );
    println!("Try: stepclamp analyze {} --branch exp", cell.root().display());
    Ok(())
}

/// Build one recording: holding current with slow drift, a control step and
/// an alpha-shaped inward response starting at stimulus onset
fn generate_mock_hold(hold: &MockHold, sample_rate: u32) -> Result<Trace> {
    let n = (RECORDING_SECONDS * sample_rate as f64) as usize;
    let rate = sample_rate as f64;
    let (on, off) = hold.stimulus;

    let mut current = Vec::with_capacity(n);
    let mut voltage = Vec::with_capacity(n);
    let mut control = Vec::with_capacity(n);

    for i in 0..n {
        let t = i as f64 / rate;
        let drift = 0.8 * (t * 0.37).sin() + 0.3 * (i as f64 * 0.61).sin();

        let response = if t > on && hold.response_amplitude > 0.0 {
            let x = (t - on) / hold.response_tau;
            -hold.response_amplitude * x * (1.0 - x).exp()
        } else {
            0.0
        };

        let stimulated = t >= on && off.map_or(true, |off| t < off);

        current.push(HOLDING_CURRENT_PA + drift + response);
        voltage.push(HOLDING_POTENTIAL_MV + 0.05 * (t * 2.3).sin());
        control.push(if stimulated { STEP_VOLTS } else { 0.0 });
    }

    let trace = Trace::from_channels(current, voltage, control, sample_rate)
        .context("Failed to build demo trace")?
        .with_source(format!("{}.parquet", hold.name));
    Ok(trace)
}
