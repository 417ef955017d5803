use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricError {
    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}: label '{value}' is not 0 or 1")]
    InvalidLabel { row: usize, value: String },

    /// Ranking metrics need at least one row of each class.
    #[error(
        "metrics need both classes: found {positives} positive and {negatives} negative labels"
    )]
    DegenerateLabelSet { positives: usize, negatives: usize },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for MetricError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetricError>;
