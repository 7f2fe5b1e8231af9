use thiserror::Error;

/// Failure of a single input source. Never aborts a run; the source is
/// skipped and the failure is reported.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("tabular source is empty or could not be parsed")]
    EmptySource,

    #[error("no header cell contains \"{marker}\"")]
    ColumnNotFound { marker: &'static str },

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

/// Failure of the final export step.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no data to export: no authors were recorded")]
    NothingToExport,

    #[error("writing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("writing output file: {0}")]
    Io(#[from] std::io::Error),
}
