//! Dataset and reference genome downloads into the cache.

use std::path::{Path, PathBuf};

use gbench_ingest::{FetchRequest, Fetcher, decompress_in_place};
use gbench_registry::{DatasetConfig, GenomeConfig};
use tracing::info;

use crate::cache::{dataset_cache_dir, genome_cache_dir};
use crate::error::Result;

/// Local copies of a dataset's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDownload {
    pub data: PathBuf,
    pub info: PathBuf,
    pub raw: Option<PathBuf>,
}

/// Fetch the processed table and description, and the raw table when asked.
///
/// Files are named `<dataset>.<fmt>`, `<dataset>_info.<fmt>` and
/// `<dataset>_raw.<fmt>` under the dataset's cache directory.
pub fn download_dataset(
    fetcher: &dyn Fetcher,
    config: &DatasetConfig,
    cache_root: &Path,
    include_raw: bool,
    force: bool,
) -> Result<DatasetDownload> {
    let dir = dataset_cache_dir(cache_root, config.task, &config.key);
    let request = |url: &str, suffix: &str, format| {
        FetchRequest::new(url, &dir)
            .with_file_name(format!("{}{suffix}", config.key))
            .with_format(format)
            .force(force)
    };

    let data = fetcher.resolve(&request(&config.data.url, "", config.data.format))?;
    let info = fetcher.resolve(&request(&config.info.url, "_info", config.info.format))?;
    let raw = match (&config.raw, include_raw) {
        (Some(raw), true) => Some(fetcher.resolve(&request(&raw.url, "_raw", raw.format))?),
        _ => None,
    };

    info!(
        task = %config.task,
        dataset = %config.key,
        dir = %dir.display(),
        "dataset files ready"
    );
    Ok(DatasetDownload { data, info, raw })
}

/// Local copies of a reference genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeDownload {
    /// Uncompressed FASTA, ready for indexing.
    pub fasta: PathBuf,
    /// GTF as downloaded; gzip is read directly.
    pub gtf: PathBuf,
}

pub fn download_genome(
    fetcher: &dyn Fetcher,
    genome: &GenomeConfig,
    cache_root: &Path,
    force: bool,
) -> Result<GenomeDownload> {
    let dir = genome_cache_dir(cache_root, &genome.build);
    let fasta_gz = fetcher.resolve(&FetchRequest::new(&genome.fasta_url, &dir).force(force))?;
    let gtf = fetcher.resolve(&FetchRequest::new(&genome.gtf_url, &dir).force(force))?;
    let fasta = decompress_in_place(&fasta_gz, force)?;
    info!(build = %genome.build, dir = %dir.display(), "reference genome ready");
    Ok(GenomeDownload { fasta, gtf })
}
