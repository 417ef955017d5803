//! On-disk cache layout.
//!
//! ```text
//! <root>/<task>/<dataset>/<dataset>.<format>        processed table
//! <root>/<task>/<dataset>/<dataset>_info.md         description
//! <root>/<task>/<dataset>/<dataset>_raw.<format>    raw source table
//! <root>/genomes/<build>/...                        reference FASTA and GTF
//! ```

use std::path::{Path, PathBuf};

use gbench_model::TaskKind;
use tracing::info;

use crate::error::{ProcessError, Result};

/// Environment variable overriding the cache root.
pub const CACHE_ROOT_ENV: &str = "GENOMIC_BENCHMARK_CACHE_ROOT";

/// Cache root relative to the home directory.
const DEFAULT_CACHE_DIR: &str = ".cache/genomics_benchmark";

const GENOMES_DIR: &str = "genomes";

/// Resolve the cache root: the explicit path, then [`CACHE_ROOT_ENV`], then
/// `~/.cache/genomics_benchmark`.
pub fn resolve_cache_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CACHE_ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_CACHE_DIR))
        .ok_or(ProcessError::NoCacheRoot {
            env: CACHE_ROOT_ENV,
        })
}

pub fn dataset_cache_dir(root: &Path, task: TaskKind, dataset: &str) -> PathBuf {
    root.join(task.as_str()).join(dataset)
}

pub fn genome_cache_dir(root: &Path, build: &str) -> PathBuf {
    root.join(GENOMES_DIR).join(build)
}

/// What [`clear_cache`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScope<'a> {
    Dataset { task: TaskKind, dataset: &'a str },
    All,
}

/// Delete cached files. Returns the removed directory, or `None` when there
/// was nothing to remove.
pub fn clear_cache(root: &Path, scope: CacheScope<'_>) -> Result<Option<PathBuf>> {
    let target = match scope {
        CacheScope::Dataset { task, dataset } => dataset_cache_dir(root, task, dataset),
        CacheScope::All => root.to_path_buf(),
    };
    if !target.exists() {
        return Ok(None);
    }
    std::fs::remove_dir_all(&target).map_err(|source| ProcessError::ClearCache {
        path: target.clone(),
        source,
    })?;
    info!(path = %target.display(), "cleared cache");
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins() {
        let root = resolve_cache_root(Some(Path::new("/tmp/gbench"))).unwrap();
        assert_eq!(root, PathBuf::from("/tmp/gbench"));
    }

    #[test]
    fn dataset_dir_layout() {
        let dir = dataset_cache_dir(Path::new("/cache"), TaskKind::Enhancer, "Fulco");
        assert_eq!(dir, PathBuf::from("/cache/enhancer/Fulco"));
        let genome = genome_cache_dir(Path::new("/cache"), "hg38");
        assert_eq!(genome, PathBuf::from("/cache/genomes/hg38"));
    }

    #[test]
    fn clears_one_dataset_or_everything() {
        let root = tempfile::tempdir().unwrap();
        let fulco = dataset_cache_dir(root.path(), TaskKind::Enhancer, "Fulco");
        let adipose = dataset_cache_dir(root.path(), TaskKind::Eqtl, "Adipose_Subcutaneous");
        for dir in [&fulco, &adipose] {
            std::fs::create_dir_all(dir).unwrap();
            std::fs::write(dir.join("table.tsv"), "a\n").unwrap();
        }

        let scope = CacheScope::Dataset {
            task: TaskKind::Enhancer,
            dataset: "Fulco",
        };
        assert_eq!(clear_cache(root.path(), scope).unwrap(), Some(fulco.clone()));
        assert!(!fulco.exists());
        assert!(adipose.exists());
        assert_eq!(clear_cache(root.path(), scope).unwrap(), None);

        let cache = root.path().join("cache");
        std::fs::create_dir_all(cache.join("eqtl")).unwrap();
        clear_cache(&cache, CacheScope::All).unwrap();
        assert!(!cache.exists());
    }
}
