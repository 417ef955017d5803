//! Error types for table, annotation and sequence ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or fetching input files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Table Codec Errors ===
    /// Extension outside csv/tsv/xlsx/parquet.
    #[error("unsupported table format '{0}'")]
    UnsupportedFormat(String),

    #[error("failed to parse table {path}: {message}")]
    TableParse { path: PathBuf, message: String },

    #[error("failed to write table {path}: {message}")]
    TableWrite { path: PathBuf, message: String },

    // === Network Errors ===
    #[error("download of {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("download of {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    // === Annotation Errors ===
    #[error("invalid GTF record in {path} at line {line}: {message}")]
    Gtf {
        path: PathBuf,
        line: u64,
        message: String,
    },

    // === Sequence Errors ===
    #[error("invalid FASTA index for {path}: {message}")]
    FastaIndex { path: PathBuf, message: String },

    #[error("sequence '{name}' not found in reference")]
    SequenceNotFound { name: String },

    #[error("region {name}:{start}-{end} is outside the sequence (length {length})")]
    InvalidRegion {
        name: String,
        start: u64,
        end: u64,
        length: u64,
    },

    // === DataFrame Errors ===
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// Map an open/read failure, distinguishing a missing file.
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
