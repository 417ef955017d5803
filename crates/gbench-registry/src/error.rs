use std::path::PathBuf;

use gbench_model::ModelError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid registry: {message}")]
    InvalidRegistry { message: String },

    #[error("invalid schema for {task}/{dataset}: {source}")]
    InvalidSchema {
        task: String,
        dataset: String,
        #[source]
        source: ModelError,
    },

    #[error("unknown {kind} '{key}' (available: {})", available.join(", "))]
    ConfigNotFound {
        kind: &'static str,
        key: String,
        available: Vec<String>,
    },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found<'a>(
        kind: &'static str,
        key: &str,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::ConfigNotFound {
            kind,
            key: key.to_string(),
            available: available.into_iter().map(str::to_string).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
