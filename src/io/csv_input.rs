//! CSV dataset loading into raw rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use super::IoError;
use crate::series::types::{RawRecord, TIMESTAMP_FIELD};

/// Reads a headed CSV into raw rows, every cell kept as a string.
///
/// Short rows are accepted and simply lack the trailing columns; malformed
/// rows are skipped with a warning.
///
/// # Errors
///
/// Returns an `IoError` if the header cannot be read or has no
/// `timestamp` column.
pub fn read_records(reader: impl Read) -> Result<Vec<RawRecord>, IoError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if !headers.iter().any(|h| h == TIMESTAMP_FIELD) {
        return Err(IoError::MissingColumn(TIMESTAMP_FIELD));
    }

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        match result {
            Ok(record) => rows.push(
                headers
                    .iter()
                    .zip(record.iter())
                    .collect::<RawRecord>(),
            ),
            Err(e) => warn!(row = line, error = %e, "skipping malformed CSV row"),
        }
    }

    debug!(rows = rows.len(), columns = headers.len(), "read CSV dataset");
    Ok(rows)
}

/// Reads a CSV file into raw rows.
///
/// # Errors
///
/// Returns an `IoError` if the file cannot be opened or parsed.
pub fn read_records_from_path(path: &Path) -> Result<Vec<RawRecord>, IoError> {
    let file = File::open(path).map_err(|source| IoError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_records(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::types::RawValue;

    #[test]
    fn reads_rows_as_strings() {
        let data = "timestamp,kwh,EV Name\n2024-01-01T00:00:00Z, 1.5 ,Electric_Vehicle_1\n2024-01-01T01:00:00Z,2,\n";
        let rows = read_records(data.as_bytes()).unwrap_or_default();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("kwh"), Some(&RawValue::Text("1.5".to_string())));
        assert_eq!(rows[1].get("EV Name"), Some(&RawValue::Text(String::new())));
    }

    #[test]
    fn short_rows_lack_trailing_columns() {
        let data = "timestamp,a,b\n2024-01-01T00:00:00Z,1\n";
        let rows = read_records(data.as_bytes()).unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get("b").is_none());
    }

    #[test]
    fn missing_timestamp_column_is_an_error() {
        let data = "time,kwh\n2024-01-01,1\n";
        let err = read_records(data.as_bytes());
        assert!(matches!(err, Err(IoError::MissingColumn("timestamp"))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_records_from_path(Path::new("/nonexistent/data.csv"));
        assert!(err.is_err_and(|e| e.to_string().contains("/nonexistent/data.csv")));
    }
}
