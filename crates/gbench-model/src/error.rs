use thiserror::Error;

/// Errors raised while constructing model values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Label thresholds must satisfy `positive > negative`.
    #[error("invalid label thresholds: positive {positive} must be greater than negative {negative}")]
    InvalidThresholds { positive: f64, negative: f64 },

    /// Distance window bounds out of order.
    #[error("invalid distance window: lower {lower} exceeds upper {upper}")]
    InvalidWindow { lower: i64, upper: i64 },

    /// Compound variant identifier that does not decompose into chr/pos/ref/alt.
    #[error("cannot parse variant '{value}': {reason}")]
    VariantParse { value: String, reason: String },

    /// Schema configuration that breaks a registry invariant.
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    /// Strand symbol other than `+` or `-`.
    #[error("unknown strand '{0}'")]
    UnknownStrand(String),

    /// File format not in the supported set.
    #[error("unknown file format '{0}'")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
