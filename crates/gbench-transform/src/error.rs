use gbench_model::ModelError;
use thiserror::Error;

/// Errors raised by the table stages.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Canonical columns absent after applying the column mapping.
    #[error("schema mismatch: missing columns {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}: cannot parse variant '{value}': {reason}")]
    VariantParse {
        row: usize,
        value: String,
        reason: String,
    },

    #[error("row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl TransformError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
