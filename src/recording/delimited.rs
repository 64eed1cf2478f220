//! Delimited-text recordings (CSV/TSV exports from acquisition software).
//!
//! The header row must name `current`, `voltage` and `control`; `time` is
//! optional. Unit suffixes such as `current (pA)` or `control [V]` are
//! ignored when matching headers.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::RecordingError;
use crate::trace::{channels, derive_time_axis, Trace};

fn normalize_header(header: &str) -> String {
    let end = header.find(['(', '[']).unwrap_or(header.len());
    header[..end].trim().to_lowercase()
}

/// Read a recording from a delimited text file
pub fn read_trace_delimited_file<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
    sample_rate: Option<u32>,
) -> Result<Trace, RecordingError> {
    let file = File::open(path)?;
    read_trace_delimited(BufReader::new(file), delimiter, sample_rate)
}

/// Read a recording from any reader.
///
/// Without an explicit `sample_rate` the rate is inferred as
/// `round(1 / median(dt))` from the time column.
pub fn read_trace_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    sample_rate: Option<u32>,
) -> Result<Trace, RecordingError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let require = |name: &str| {
        find(name).ok_or_else(|| RecordingError::ColumnNotFound(name.to_string()))
    };

    let current_idx = require(channels::CURRENT)?;
    let voltage_idx = require(channels::VOLTAGE)?;
    let control_idx = require(channels::CONTROL)?;
    let time_idx = find(channels::TIME);

    let mut time = Vec::new();
    let mut current = Vec::new();
    let mut voltage = Vec::new();
    let mut control = Vec::new();

    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let field = |idx: usize, name: &str| -> Result<f64, RecordingError> {
            let raw = record.get(idx).ok_or_else(|| {
                RecordingError::InvalidFormat(format!("row {}: missing '{}' field", row + 1, name))
            })?;
            raw.parse().map_err(|_| {
                RecordingError::InvalidFormat(format!(
                    "row {}: '{}' value '{}' is not a number",
                    row + 1,
                    name,
                    raw
                ))
            })
        };

        current.push(field(current_idx, channels::CURRENT)?);
        voltage.push(field(voltage_idx, channels::VOLTAGE)?);
        control.push(field(control_idx, channels::CONTROL)?);
        if let Some(idx) = time_idx {
            time.push(field(idx, channels::TIME)?);
        }
    }

    let sample_rate = match sample_rate {
        Some(rate) => rate,
        None if time_idx.is_some() => infer_sample_rate(&time)?,
        None => {
            return Err(RecordingError::MissingSampleRate(
                "no time column and no sample rate supplied".to_string(),
            ))
        }
    };

    if time_idx.is_none() {
        time = derive_time_axis(current.len(), sample_rate);
    }

    Ok(Trace::new(time, current, voltage, control, sample_rate)?)
}

/// Infer an integer sample rate from the median sampling interval
pub fn infer_sample_rate(time: &[f64]) -> Result<u32, RecordingError> {
    let mut intervals: Vec<f64> = time.windows(2).map(|pair| pair[1] - pair[0]).collect();
    if intervals.is_empty() {
        return Err(RecordingError::MissingSampleRate(
            "need at least two timestamps to infer a sample rate".to_string(),
        ));
    }

    intervals.sort_by(|a, b| a.total_cmp(b));
    let median = intervals[intervals.len() / 2];
    let rate = (1.0 / median).round();

    if !median.is_finite() || median <= 0.0 || !rate.is_finite() || rate < 1.0 || rate > u32::MAX as f64 {
        return Err(RecordingError::MissingSampleRate(format!(
            "median sampling interval {} s does not give a usable rate",
            median
        )));
    }

    Ok(rate as u32)
}
