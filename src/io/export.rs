//! Chart-ready bucket export as CSV or JSON.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use super::IoError;
use crate::series::types::{Bucket, FieldReducerSpec};

/// Leading columns of every CSV export, before the reduced fields.
const LEADING_COLUMNS: [&str; 2] = ["timestamp", "time_step_label"];

/// Output encoding for exported buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format \"{other}\" (expected csv or json)")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Writes buckets as CSV to any writer.
///
/// The header is `timestamp,time_step_label` followed by the reducer fields in
/// order. Null values are written as empty cells. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns an `IoError` if writing fails.
pub fn write_csv(
    buckets: &[Bucket],
    reducers: &FieldReducerSpec,
    writer: impl Write,
) -> Result<(), IoError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(LEADING_COLUMNS.into_iter().chain(reducers.fields()))?;

    for b in buckets {
        let mut row = vec![b.timestamp.to_string(), b.time_step_label.clone()];
        row.extend(
            reducers
                .fields()
                .map(|field| b.get(field).map(ToString::to_string).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes buckets as a pretty-printed JSON array of flat objects.
///
/// # Errors
///
/// Returns an `IoError` if encoding or writing fails.
pub fn write_json(buckets: &[Bucket], mut writer: impl Write) -> Result<(), IoError> {
    serde_json::to_writer_pretty(&mut writer, buckets)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Exports buckets to a file at `path` in the requested format.
///
/// # Errors
///
/// Returns an `IoError` if file creation or writing fails.
pub fn export(
    buckets: &[Bucket],
    reducers: &FieldReducerSpec,
    format: ExportFormat,
    path: &Path,
) -> Result<(), IoError> {
    let file = File::create(path).map_err(|source| IoError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let buf = BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(buckets, reducers, buf),
        ExportFormat::Json => write_json(buckets, buf),
    }
}
