//! Canonical column names shared by every stage.

pub const CHR: &str = "chr";
pub const START: &str = "start";
pub const END: &str = "end";
pub const REF: &str = "ref";
pub const ALT: &str = "alt";
pub const VARIANT_ID: &str = "variant_id";
pub const GENE_NAME: &str = "gene_name";
pub const GENE_TSS: &str = "gene_tss";
pub const STRAND: &str = "strand";
pub const BIOTYPE: &str = "biotype";
pub const DISTANCE: &str = "distance";
pub const SCORE: &str = "score";
pub const LABEL: &str = "label";

/// Biotype kept by the protein-coding filter.
pub const PROTEIN_CODING: &str = "protein_coding";
