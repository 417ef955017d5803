//! Task-specific derived columns.
//!
//! Enhancer pairs gain a `strand` column. eQTL rows are decomposed from their
//! variant identifier and joined to the gene annotation for strand, TSS,
//! biotype and distance.

mod enhancer;
mod eqtl;
mod reference;

use gbench_model::GeneAnnotation;
use polars::prelude::DataFrame;

use crate::error::Result;

pub use enhancer::EnhancerDeriver;
pub use eqtl::{EqtlDeriver, compute_distance, join_annotation, parse_variants};
pub use reference::{ReferenceMatchReport, verify_reference_alleles};

/// Counters describing what a derivation did to the rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeriveStats {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Rows whose strand was filled with the default `+`.
    pub strand_defaulted: usize,
    /// Rows dropped for lack of an annotation match.
    pub unmatched_dropped: usize,
}

/// Output of a [`FeatureDeriver`].
#[derive(Debug, Clone)]
pub struct Derived {
    pub data: DataFrame,
    pub stats: DeriveStats,
}

/// Adds the derived columns for one task family.
pub trait FeatureDeriver {
    /// Short stage name used in logs and provenance.
    fn name(&self) -> &'static str;

    fn derive(&self, df: DataFrame, annotation: &GeneAnnotation) -> Result<Derived>;
}
