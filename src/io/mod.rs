//! Dataset loading and chart-ready export.

pub mod csv_input;
pub mod export;

use thiserror::Error;

/// Errors raised at the file boundary.
///
/// The pipeline itself never fails; only reading and writing files can.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("cannot open \"{path}\": {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required column \"{0}\"")]
    MissingColumn(&'static str),
}
