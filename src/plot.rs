//! Diagnostic plots for manual review of a measurement.
//!
//! Plots are advisory: they never feed back into a measurement, and a
//! rendering failure only produces a warning in batch runs.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::analysis::ResponseMeasurement;
use crate::trace::Trace;

/// Errors that can occur while rendering plots
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// I/O error creating the output folder
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Drawing backend failure
    #[error("failed to render plot: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>> for PlotError {
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(format!("{value:?}"))
    }
}

/// Output size and colours
#[derive(Clone, Debug)]
pub struct PlotStyle {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Colour of the current trace
    pub current: RGBColor,
    /// Colour of the control channel
    pub control: RGBColor,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            current: BLACK,
            control: RGBColor(0x6b, 0xa5, 0x66),
        }
    }
}

/// Padded y-range that never collapses to zero height
fn y_bounds(values: &[f64]) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(1e-3);
    (min - pad, max + pad)
}

/// Plot the current inside the response window
pub fn render_response_window(
    path: &Path,
    trace: &Trace,
    measurement: &ResponseMeasurement,
    style: &PlotStyle,
) -> Result<(), PlotError> {
    let window = measurement.window();
    let slice = &trace.current()[window.start..window.end];
    let (y_min, y_max) = y_bounds(slice);

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            format!("Response window [{}, {})", window.start, window.end),
            ("sans-serif", 20),
        )
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(window.start as f64..window.end as f64, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Sample")
        .y_desc("Current (pA)")
        .draw()?;

    chart.draw_series(LineSeries::new(
        slice
            .iter()
            .enumerate()
            .map(|(i, &v)| ((window.start + i) as f64, v)),
        &style.current,
    ))?;

    let mean = measurement.response_current();
    chart.draw_series(LineSeries::new(
        vec![(window.start as f64, mean), (window.end as f64, mean)],
        RED.stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

/// Plot the full recording: control channel (scaled by 1/5) above the
/// current, with the response window shaded
pub fn render_overview(
    path: &Path,
    trace: &Trace,
    measurement: &ResponseMeasurement,
    style: &PlotStyle,
) -> Result<(), PlotError> {
    let time = trace.time();
    let t_end = time.last().copied().unwrap_or(0.0).max(f64::EPSILON);
    let control: Vec<f64> = trace.control().iter().map(|v| v / 5.0).collect();

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(style.height as i32 / 9);

    let (c_min, c_max) = y_bounds(&control);
    let mut control_chart = ChartBuilder::on(&upper)
        .margin(5)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .build_cartesian_2d(0.0..t_end, c_min..c_max)?;
    control_chart.draw_series(LineSeries::new(
        time.iter().copied().zip(control.iter().copied()),
        style.control.stroke_width(2),
    ))?;

    let (i_min, i_max) = y_bounds(trace.current());
    let mut current_chart = ChartBuilder::on(&lower)
        .margin(5)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..t_end, i_min..i_max)?;
    current_chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Current (pA)")
        .draw()?;

    let window = measurement.window();
    let t_start = time[window.start];
    let t_stop = time[window.end - 1];
    current_chart.draw_series(std::iter::once(Rectangle::new(
        [(t_start, i_min), (t_stop, i_max)],
        BLUE.mix(0.15).filled(),
    )))?;

    current_chart.draw_series(LineSeries::new(
        time.iter().copied().zip(trace.current().iter().copied()),
        &style.current,
    ))?;

    root.present()?;
    Ok(())
}

/// Render both diagnostic plots into `dir`, named after the trace source.
///
/// Returns the paths written.
pub fn render_diagnostics(
    dir: &Path,
    trace: &Trace,
    measurement: &ResponseMeasurement,
) -> Result<Vec<PathBuf>, PlotError> {
    std::fs::create_dir_all(dir)?;

    let stem = trace
        .source()
        .map(|s| {
            Path::new(s)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| s.to_string())
        })
        .unwrap_or_else(|| "trace".to_string());

    let style = PlotStyle::default();
    let window_path = dir.join(format!("{}_response_window.png", stem));
    let overview_path = dir.join(format!("{}_overview.png", stem));

    render_response_window(&window_path, trace, measurement, &style)?;
    render_overview(&overview_path, trace, measurement, &style)?;

    Ok(vec![window_path, overview_path])
}
