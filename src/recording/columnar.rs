//! Parquet recording layout.
//!
//! One row per sample, Float64 columns `time`, `current`, `voltage` and
//! `control`. The sample rate lives in the footer key-value metadata.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;

use super::RecordingError;
use crate::trace::{channels, derive_time_axis, Trace};

/// Recording layout version written to the footer
pub const RECORDING_FORMAT_VERSION: &str = "1.0.0";

/// Metadata key for layout version in Parquet footer
pub const KEY_FORMAT_VERSION: &str = "stepclamp:format_version";

/// Metadata key for the sample rate (samples per second)
pub const KEY_SAMPLE_RATE: &str = "stepclamp:sample_rate";

/// Metadata key for the original acquisition file name
pub const KEY_SOURCE_FILE: &str = "stepclamp:source_file";

/// Arrow schema for a recording
pub fn create_trace_schema() -> Schema {
    Schema::new(vec![
        Field::new(channels::TIME, DataType::Float64, false),
        Field::new(channels::CURRENT, DataType::Float64, false),
        Field::new(channels::VOLTAGE, DataType::Float64, false),
        Field::new(channels::CONTROL, DataType::Float64, false),
    ])
}

fn writer_properties(trace: &Trace) -> WriterProperties {
    let mut kv_metadata = vec![
        KeyValue {
            key: KEY_FORMAT_VERSION.to_string(),
            value: Some(RECORDING_FORMAT_VERSION.to_string()),
        },
        KeyValue {
            key: KEY_SAMPLE_RATE.to_string(),
            value: Some(trace.sample_rate().to_string()),
        },
    ];
    if let Some(source) = trace.source() {
        kv_metadata.push(KeyValue {
            key: KEY_SOURCE_FILE.to_string(),
            value: Some(source.to_string()),
        });
    }

    WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::default()))
        .set_key_value_metadata(Some(kv_metadata))
        .build()
}

/// Write a trace as a single-row-group Parquet recording
pub fn write_trace_parquet<P: AsRef<Path>>(path: P, trace: &Trace) -> Result<(), RecordingError> {
    let schema = Arc::new(create_trace_schema());
    let file = File::create(path.as_ref())?;
    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(writer_properties(trace)))?;

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Float64Array::from(trace.time().to_vec())),
        Arc::new(Float64Array::from(trace.current().to_vec())),
        Arc::new(Float64Array::from(trace.voltage().to_vec())),
        Arc::new(Float64Array::from(trace.control().to_vec())),
    ];
    let batch = RecordBatch::try_new(schema, arrays)?;

    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Read a Parquet recording.
///
/// `sample_rate` overrides the rate stored in the footer. Without either
/// the load fails with [`RecordingError::MissingSampleRate`].
pub fn read_trace_parquet<P: AsRef<Path>>(
    path: P,
    sample_rate: Option<u32>,
) -> Result<Trace, RecordingError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let mut kv_metadata = HashMap::new();
    if let Some(kv_list) = builder.metadata().file_metadata().key_value_metadata() {
        for kv in kv_list {
            if let Some(value) = &kv.value {
                kv_metadata.insert(kv.key.clone(), value.clone());
            }
        }
    }

    let sample_rate = match sample_rate {
        Some(rate) => rate,
        None => stored_sample_rate(&kv_metadata, path)?,
    };

    let mut time = Vec::new();
    let mut current = Vec::new();
    let mut voltage = Vec::new();
    let mut control = Vec::new();
    let mut has_time = true;

    for batch in builder.build()? {
        let batch = batch?;
        append_column(&batch, channels::CURRENT, &mut current)?;
        append_column(&batch, channels::VOLTAGE, &mut voltage)?;
        append_column(&batch, channels::CONTROL, &mut control)?;
        if batch.column_by_name(channels::TIME).is_some() {
            append_column(&batch, channels::TIME, &mut time)?;
        } else {
            has_time = false;
        }
    }

    if !has_time {
        debug!("{}: no time column, deriving from {} Hz", path.display(), sample_rate);
        time = derive_time_axis(current.len(), sample_rate);
    }

    let trace = Trace::new(time, current, voltage, control, sample_rate)?;
    Ok(match kv_metadata.get(KEY_SOURCE_FILE) {
        Some(source) => trace.with_source(source.clone()),
        None => trace,
    })
}

fn stored_sample_rate(
    kv_metadata: &HashMap<String, String>,
    path: &Path,
) -> Result<u32, RecordingError> {
    let raw = kv_metadata.get(KEY_SAMPLE_RATE).ok_or_else(|| {
        RecordingError::MissingSampleRate(format!(
            "{} has no '{}' metadata and no rate was supplied",
            path.display(),
            KEY_SAMPLE_RATE
        ))
    })?;

    raw.trim().parse().map_err(|_| {
        RecordingError::InvalidFormat(format!("'{}' is not a valid sample rate", raw))
    })
}

/// Append a numeric column, widening Float32/integer columns to Float64
fn append_column(batch: &RecordBatch, name: &str, out: &mut Vec<f64>) -> Result<(), RecordingError> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| RecordingError::ColumnNotFound(name.to_string()))?;

    if column.null_count() > 0 {
        return Err(RecordingError::InvalidFormat(format!(
            "{} contains {} null values",
            name,
            column.null_count()
        )));
    }

    let widened = arrow::compute::cast(column.as_ref(), &DataType::Float64)?;
    let values = widened
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| RecordingError::InvalidFormat(format!("{} is not numeric", name)))?;

    out.extend_from_slice(values.values());
    Ok(())
}
