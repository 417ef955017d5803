//! Row filters applied between derivation and labeling.

use gbench_model::{DistanceWindow, is_snp};
use gbench_model::columns::{ALT, BIOTYPE, DISTANCE, PROTEIN_CODING, REF};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::table::{filter_logged, floats, strings};

/// Keep rows whose `distance` lies in the closed window. Null distances are
/// dropped; fractional distances are compared as-is.
pub fn filter_by_distance(df: &DataFrame, window: DistanceWindow) -> Result<DataFrame> {
    let keep: Vec<bool> = floats(df, DISTANCE)?
        .into_iter()
        .map(|distance| distance.is_some_and(|d| window.contains_f64(d)))
        .collect();
    filter_logged(df, &keep, "filter_by_distance")
}

/// Keep single-nucleotide variants: `ref` and `alt` are both one base.
pub fn filter_snp_only(df: &DataFrame) -> Result<DataFrame> {
    let ref_allele = strings(df, REF)?;
    let alt_allele = strings(df, ALT)?;
    let keep: Vec<bool> = ref_allele
        .iter()
        .zip(&alt_allele)
        .map(|(r, a)| match (r, a) {
            (Some(r), Some(a)) => is_snp(r, a),
            _ => false,
        })
        .collect();
    filter_logged(df, &keep, "filter_snp_only")
}

/// Keep rows whose gene biotype is `protein_coding`.
pub fn filter_protein_coding(df: &DataFrame) -> Result<DataFrame> {
    let keep: Vec<bool> = strings(df, BIOTYPE)?
        .iter()
        .map(|biotype| biotype.as_deref() == Some(PROTEIN_CODING))
        .collect();
    filter_logged(df, &keep, "filter_protein_coding")
}
