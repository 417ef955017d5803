//! Benchmark output generation.
//!
//! - **TSV**: the processed table, one file per dataset
//! - **VCF**: minimal VCFv4.2 files split by label, plus a count summary

mod common;
mod tsv;
mod vcf;

pub use common::{ensure_parent_dir, processed_output_path};
pub use tsv::write_tsv;
pub use vcf::{
    NEGATIVE_VCF, POSITIVE_VCF, SUMMARY_FILE, VcfExport, VCF_HEADER, write_minimal_vcf,
};
