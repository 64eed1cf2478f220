//! # Measurement Export
//!
//! Writes one flat row per measured recording for downstream
//! cross-condition statistics:
//!
//! | Column | Description |
//! |--------|-------------|
//! | folder | Cell folder the recording belongs to |
//! | filename | Recording file name |
//! | steadyStateCurrent | Baseline current (pA) |
//! | endCurrent | Response current (pA) |
//! | diff | `endCurrent - steadyStateCurrent` (pA) |
//! | windowStartIndex | First sample of the response window |
//! | windowEndIndex | One past the last sample of the response window |
//!
//! A JSON [`RunSummary`] is written next to the table so rejected
//! recordings and the parameters used stay on record.

mod summary;

pub use summary::{RecordStatus, RunSummary, SummaryRecord};

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::ResponseMeasurement;

/// Errors that can occur while exporting measurements
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One output row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRow {
    /// Cell folder
    pub folder: String,
    /// Recording file name
    pub filename: String,
    /// Baseline current (pA)
    pub steady_state_current: f64,
    /// Response current (pA)
    pub end_current: f64,
    /// Response minus baseline (pA)
    pub diff: f64,
    /// Response window start (inclusive)
    pub window_start_index: usize,
    /// Response window end (exclusive)
    pub window_end_index: usize,
}

impl MeasurementRow {
    /// Build a row from a measurement
    pub fn from_measurement(
        folder: impl Into<String>,
        filename: impl Into<String>,
        measurement: &ResponseMeasurement,
    ) -> Self {
        Self {
            folder: folder.into(),
            filename: filename.into(),
            steady_state_current: measurement.baseline_current(),
            end_current: measurement.response_current(),
            diff: measurement.delta(),
            window_start_index: measurement.window().start,
            window_end_index: measurement.window().end,
        }
    }
}

/// CSV writer for measurement rows
pub struct MeasurementWriter<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl MeasurementWriter<File> {
    /// Create (or truncate) a table at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let file = File::create(path)?;
        Ok(Self::new(file, true))
    }

    /// Append to a table at `path`, writing the header only if the file is
    /// new or empty
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let has_content = path.metadata().map(|m| m.len() > 0).unwrap_or(false);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file, !has_content))
    }
}

impl<W: Write> MeasurementWriter<W> {
    /// Wrap any writer
    pub fn new(writer: W, write_header: bool) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(writer);
        Self {
            writer,
            rows_written: 0,
        }
    }

    /// Write one row
    pub fn write_row(&mut self, row: &MeasurementRow) -> Result<(), ExportError> {
        self.writer.serialize(row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of rows written so far
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the number of rows written
    pub fn finish(mut self) -> Result<usize, ExportError> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}

/// Parse rows from a measurement table
pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<MeasurementRow>, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Parse rows from a measurement table on disk
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<MeasurementRow>, ExportError> {
    read_rows_from(File::open(path)?)
}
