//! Input side of the benchmark pipeline.
//!
//! - [`codec`]: read and write tables by file extension
//! - [`fetch`]: cached downloads of dataset and reference files
//! - [`gtf`]: gene annotation (name, strand, TSS, biotype) from GTF
//! - [`fasta`]: indexed reference lookups for allele checks

pub mod codec;
pub mod compression;
pub mod error;
pub mod fasta;
pub mod fetch;
pub mod gtf;

pub use codec::{read_table, table_format, write_table};
pub use compression::{decompress_in_place, open_text};
pub use error::{IngestError, Result};
pub use fasta::{FaiEntry, FaiIndex, IndexedFasta, SequenceSource, fai_path};
pub use fetch::{CachedFetcher, FetchConfig, FetchRequest, Fetcher, cache_file_name};
pub use gtf::{GtfLoadStats, load_gene_annotation, load_gene_annotation_with_stats, parse_attributes};
