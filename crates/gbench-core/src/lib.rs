//! Dataset processing for the genomic benchmark.
//!
//! Composes the table stages from `gbench-transform` into one processor per
//! task, and owns the cache layout used by downloads and processed outputs.

pub mod cache;
pub mod context;
pub mod download;
pub mod error;
pub mod pipeline;
pub mod processors;

pub use cache::{
    CACHE_ROOT_ENV, CacheScope, clear_cache, dataset_cache_dir, genome_cache_dir,
    resolve_cache_root,
};
pub use context::{ProcessContext, ProcessOptions};
pub use download::{DatasetDownload, GenomeDownload, download_dataset, download_genome};
pub use error::{ProcessError, Result};
pub use pipeline::{load_frame, process_frame, process_frame_with_registry};
pub use processors::{
    DatasetProcessor, EnhancerProcessor, EqtlProcessor, ProcessReport, ProcessorRegistry,
    default_registry,
};
