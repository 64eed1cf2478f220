use anyhow::{Context, Result};
use std::path::PathBuf;

use stepclamp::analysis::locate_step;
use stepclamp::recording::load_trace;

/// Display a recording summary and where the step was found
pub fn run(file: PathBuf, threshold: f64, sample_rate: Option<u32>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let trace = load_trace(&file, sample_rate)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    println!("Recording Information");
    println!("=====================");
    println!("File: {}", file.display());
    println!();
    println!("{}", trace.summary());
    println!();

    println!("Step (threshold {} V):", threshold);
    match locate_step(trace.control(), threshold) {
        Ok(step) => {
            let rate = trace.sample_rate();
            println!(
                "  Onset:     sample {} ({:.3} s)",
                step.onset_index(),
                step.onset_index() as f64 / rate as f64
            );
            println!(
                "  Offset:    sample {} ({:.3} s)",
                step.offset_index(),
                step.offset_index() as f64 / rate as f64
            );
            println!("  Duration:  {:.3} s", step.duration_seconds(rate));
            println!("  Amplitude: {} V", step.step_amplitude());
        }
        Err(e) => println!("  Not located: {}", e),
    }

    Ok(())
}
