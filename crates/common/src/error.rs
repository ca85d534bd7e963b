use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for a Sluice conversion.
///
/// Every variant aborts the whole conversion; there is no per-row retry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Failed to open output {path}: {reason}")]
    Open { path: PathBuf, reason: String },
    #[error("Failed to write row {row} (column {column}): {reason}")]
    Write { row: u64, column: String, reason: String },
    #[error("Fetch failed after {rows_read} rows: {reason}")]
    Fetch { rows_read: u64, reason: String },
    #[error("Failed to finalize {path}: {reason}")]
    Finalize { path: PathBuf, reason: String },
    #[error("Conversion cancelled after {rows_read} rows")]
    Cancelled { rows_read: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn open(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Open { path: path.into(), reason: reason.to_string() }
    }

    pub fn write(row: u64, column: impl Into<String>, reason: impl ToString) -> Self {
        Error::Write { row, column: column.into(), reason: reason.to_string() }
    }

    pub fn finalize(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Finalize { path: path.into(), reason: reason.to_string() }
    }

    /// Short, stable name of the error class, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Connection(_) => "connection",
            Error::Query(_) => "query",
            Error::Open { .. } => "open",
            Error::Write { .. } => "write",
            Error::Fetch { .. } => "fetch",
            Error::Finalize { .. } => "finalize",
            Error::Cancelled { .. } => "cancelled",
        }
    }
}
