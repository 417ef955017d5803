use gbench_model::columns::{GENE_NAME, STRAND};
use gbench_model::{GeneAnnotation, Strand};
use polars::prelude::{Column, DataFrame};
use tracing::{info, warn};

use super::{DeriveStats, Derived, FeatureDeriver};
use crate::error::Result;
use crate::table::strings;

/// Strand lookup for enhancer–gene pairs.
///
/// Genes missing from the annotation default to `+`; no row is dropped and
/// the existing `distance` is kept as published.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnhancerDeriver;

impl FeatureDeriver for EnhancerDeriver {
    fn name(&self) -> &'static str {
        "derive_enhancer"
    }

    fn derive(&self, mut df: DataFrame, annotation: &GeneAnnotation) -> Result<Derived> {
        let genes = strings(&df, GENE_NAME)?;
        let mut defaulted = 0;
        let strands: Vec<&str> = genes
            .iter()
            .map(|gene| {
                match gene.as_deref().and_then(|name| annotation.strand(name)) {
                    Some(strand) => strand.as_str(),
                    None => {
                        defaulted += 1;
                        Strand::Plus.as_str()
                    }
                }
            })
            .collect();

        if defaulted > 0 {
            warn!(
                rows = defaulted,
                "genes without strand information, defaulting to '+'"
            );
        }
        df.with_column(Column::new(STRAND.into(), strands))?;
        info!(rows = df.height(), "added strand information");

        let rows = df.height();
        Ok(Derived {
            data: df,
            stats: DeriveStats {
                rows_in: rows,
                rows_out: rows,
                strand_defaulted: defaulted,
                unmatched_dropped: 0,
            },
        })
    }
}
