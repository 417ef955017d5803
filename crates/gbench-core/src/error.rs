use std::path::PathBuf;

use gbench_ingest::IngestError;
use gbench_model::TaskKind;
use gbench_registry::RegistryError;
use gbench_transform::TransformError;
use thiserror::Error;

/// Failures while fetching or processing one dataset.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A table stage failed; names the dataset and stage.
    #[error("{task}/{dataset}: {stage} failed")]
    Stage {
        task: TaskKind,
        dataset: String,
        stage: &'static str,
        #[source]
        source: TransformError,
    },

    #[error("no processor registered for task '{0}'")]
    NoProcessor(TaskKind),

    #[error("cannot determine a cache directory: set --cache-root or {env}")]
    NoCacheRoot { env: &'static str },

    #[error("failed to clear cache at {path}: {source}")]
    ClearCache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ProcessError>;
