use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use stepclamp::analysis::StepResponseExtractor;
use stepclamp::recording::load_trace;

use super::ResolvedSettings;

/// Measure one recording and print the measurement as JSON
pub fn run(file: PathBuf, settings: ResolvedSettings) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let extractor = StepResponseExtractor::new(settings.branch, settings.config)
        .context("Invalid analysis parameters")?;

    let trace = load_trace(&file, settings.sample_rate)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    info!("{}", trace.summary());

    let measurement = extractor
        .extract(&trace)
        .with_context(|| format!("{} rejected", file.display()))?;

    println!("{}", serde_json::to_string_pretty(&measurement)?);
    Ok(())
}
