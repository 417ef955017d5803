//! Registry location resolution.

use std::path::PathBuf;

/// Environment variable pointing at a registry TOML that replaces the built-in one.
pub const REGISTRY_ENV_VAR: &str = "GBENCH_REGISTRY";

/// Registry file named by `GBENCH_REGISTRY`, if set and non-empty.
pub fn registry_override() -> Option<PathBuf> {
    std::env::var_os(REGISTRY_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
