use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use stepclamp::analysis::StepResponseExtractor;
use stepclamp::batch::BatchAnalyzer;
use stepclamp::export::{MeasurementWriter, RunSummary};
use stepclamp::recording::CellFolder;

use super::ResolvedSettings;

/// Measure every recording in a cell's hold folder and write the results table
pub fn run(
    folder: PathBuf,
    settings: ResolvedSettings,
    output: Option<PathBuf>,
    append: bool,
    plots: bool,
) -> Result<()> {
    if !folder.is_dir() {
        anyhow::bail!("Cell folder does not exist: {}", folder.display());
    }

    let cell = CellFolder::new(folder);
    let experiment = settings.experiment;

    info!("stepclamp - Hold Analysis");
    info!("=========================");
    info!("Cell:       {}", cell.root().display());
    info!("Experiment: {}", experiment);
    info!("Branch:     {}", settings.branch);

    let extractor = StepResponseExtractor::new(settings.branch, settings.config.clone())
        .context("Invalid analysis parameters")?;

    let batch = BatchAnalyzer::new(extractor).with_sample_rate(settings.sample_rate);

    #[cfg(feature = "plots")]
    let batch = batch.with_figures_dir(plots.then(|| cell.figures_dir()));

    #[cfg(not(feature = "plots"))]
    if plots {
        warn!("--plots ignored: stepclamp was built without the plots feature");
    }

    let report = batch
        .analyze_cell(&cell, experiment)
        .with_context(|| format!("Failed to analyze {}", cell.root().display()))?;

    let output = output.unwrap_or_else(|| cell.default_output_path(experiment));
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut writer = if append {
        MeasurementWriter::append(&output)
    } else {
        MeasurementWriter::create(&output)
    }
    .with_context(|| format!("Failed to open {}", output.display()))?;

    for row in report.rows() {
        writer.write_row(&row).context("Failed to write measurement row")?;
    }
    let written = writer.finish().context("Failed to finalize results table")?;
    info!("Wrote {} row(s) to {}", written, output.display());

    let summary_path = RunSummary::sidecar_path(&output);
    report
        .to_summary(settings.config)
        .write_to(&summary_path)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;
    info!("Run summary: {}", summary_path.display());

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if report.entries.is_empty() {
        warn!("No recordings found in {}", cell.hold_folder(experiment).display());
    }

    // Individual rejections are expected; only a fully rejected folder fails the run.
    if report.all_rejected() {
        std::process::exit(1);
    }

    Ok(())
}
