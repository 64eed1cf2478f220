//! # Recording Adapters
//!
//! Loads [`Trace`]s from files on disk and knows the cell-folder layout
//! used by the hold experiments:
//!
//! ```text
//! cs4_cell1/
//! ├── holds_UV/          # UV pulse hold recordings
//! ├── holds_drug/        # drug addition hold recordings
//! ├── analysedData/      # holding_current_values_{UV|drug}_pA.csv
//! └── figures/           # diagnostic plots
//! ```
//!
//! The acquisition system's own binary container is not read directly.
//! Recordings are exported to one of:
//!
//! | Extension | Layout |
//! |-----------|--------|
//! | `.parquet` | Float64 columns, sample rate in footer metadata |
//! | `.csv` | comma-separated, header row |
//! | `.tsv`, `.txt` | tab-separated, header row |

mod columnar;
mod delimited;
mod error;
mod layout;

#[cfg(test)]
mod tests;

pub use columnar::{
    create_trace_schema, read_trace_parquet, write_trace_parquet, KEY_FORMAT_VERSION,
    KEY_SAMPLE_RATE, KEY_SOURCE_FILE, RECORDING_FORMAT_VERSION,
};
pub use delimited::{infer_sample_rate, read_trace_delimited, read_trace_delimited_file};
pub use error::RecordingError;
pub use layout::{discover_recordings, CellFolder, ExperimentKind, ANALYSED_DATA_DIR, FIGURES_DIR};

use std::path::Path;

use log::debug;

use crate::trace::Trace;

/// On-disk recording format, chosen by file extension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingFormat {
    /// Apache Parquet
    Parquet,
    /// Comma-separated text
    Csv,
    /// Tab-separated text
    Tsv,
}

impl RecordingFormat {
    /// Pick the format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, RecordingError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "parquet" => Ok(RecordingFormat::Parquet),
            "csv" => Ok(RecordingFormat::Csv),
            "tsv" | "txt" => Ok(RecordingFormat::Tsv),
            _ => Err(RecordingError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load a recording, labelling the trace with its file name.
///
/// `sample_rate` overrides any rate stored in or inferred from the file.
pub fn load_trace<P: AsRef<Path>>(path: P, sample_rate: Option<u32>) -> Result<Trace, RecordingError> {
    let path = path.as_ref();
    let format = RecordingFormat::from_path(path)?;
    debug!("Loading {} as {:?}", path.display(), format);

    let trace = match format {
        RecordingFormat::Parquet => read_trace_parquet(path, sample_rate)?,
        RecordingFormat::Csv => read_trace_delimited_file(path, b',', sample_rate)?,
        RecordingFormat::Tsv => read_trace_delimited_file(path, b'\t', sample_rate)?,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(trace.with_source(file_name))
}
