#![deny(unsafe_code)]

pub mod error;
pub mod manifest;
pub mod paths;
pub mod registry;

pub use crate::error::{RegistryError, Result};
pub use crate::manifest::RemoteFile;
pub use crate::paths::{REGISTRY_ENV_VAR, registry_override};
pub use crate::registry::{DatasetConfig, GenomeConfig, Registry, TaskConfig};
