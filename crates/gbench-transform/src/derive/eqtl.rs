use gbench_model::columns::{
    ALT, BIOTYPE, CHR, DISTANCE, END, GENE_NAME, GENE_TSS, REF, START, STRAND, VARIANT_ID,
};
use gbench_model::{GeneAnnotation, ModelError, Variant};
use polars::prelude::{Column, DataFrame};
use tracing::{info, warn};

use super::{DeriveStats, Derived, FeatureDeriver};
use crate::error::{Result, TransformError};
use crate::table::{integers, retain_rows, strings};

/// Variant decomposition, annotation join and distance for fine-mapped eQTLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqtlDeriver;

impl FeatureDeriver for EqtlDeriver {
    fn name(&self) -> &'static str {
        "derive_eqtl"
    }

    fn derive(&self, df: DataFrame, annotation: &GeneAnnotation) -> Result<Derived> {
        let rows_in = df.height();
        let parsed = parse_variants(df)?;
        let (joined, dropped) = join_annotation(parsed, annotation)?;
        let data = compute_distance(joined)?;
        Ok(Derived {
            stats: DeriveStats {
                rows_in,
                rows_out: data.height(),
                strand_defaulted: 0,
                unmatched_dropped: dropped,
            },
            data,
        })
    }
}

/// Split `variant_id` (`chr_pos_ref_alt[_build]`) into `chr`, `start`, `end`,
/// `ref` and `alt`. `end` equals `start`.
///
/// The first malformed identifier aborts with its row number.
pub fn parse_variants(mut df: DataFrame) -> Result<DataFrame> {
    let ids = strings(&df, VARIANT_ID)?;
    let height = ids.len();
    let mut chr = Vec::with_capacity(height);
    let mut pos = Vec::with_capacity(height);
    let mut ref_allele = Vec::with_capacity(height);
    let mut alt_allele = Vec::with_capacity(height);

    for (row, id) in ids.into_iter().enumerate() {
        let id = id.unwrap_or_default();
        let variant: Variant = id.parse().map_err(|err| match err {
            ModelError::VariantParse { value, reason } => {
                TransformError::VariantParse { row, value, reason }
            }
            other => TransformError::Model(other),
        })?;
        chr.push(variant.chr);
        pos.push(variant.pos);
        ref_allele.push(variant.ref_allele);
        alt_allele.push(variant.alt_allele);
    }

    df.with_column(Column::new(CHR.into(), chr))?;
    df.with_column(Column::new(START.into(), pos.clone()))?;
    df.with_column(Column::new(END.into(), pos))?;
    df.with_column(Column::new(REF.into(), ref_allele))?;
    df.with_column(Column::new(ALT.into(), alt_allele))?;
    Ok(df)
}

/// Attach `strand`, `gene_tss` and `biotype` by `gene_name`.
///
/// Rows whose gene is not annotated are dropped; the count is returned and
/// logged. Row order is preserved.
pub fn join_annotation(
    mut df: DataFrame,
    annotation: &GeneAnnotation,
) -> Result<(DataFrame, usize)> {
    let genes = strings(&df, GENE_NAME)?;
    let height = genes.len();
    let mut strand = Vec::with_capacity(height);
    let mut tss = Vec::with_capacity(height);
    let mut biotype = Vec::with_capacity(height);
    let mut keep = Vec::with_capacity(height);

    for gene in &genes {
        let record = gene.as_deref().and_then(|name| annotation.get(name));
        keep.push(record.is_some());
        strand.push(record.map(|r| r.strand.as_str()));
        tss.push(record.map(gbench_model::GeneRecord::tss));
        biotype.push(record.and_then(|r| r.biotype.clone()));
    }

    df.with_column(Column::new(STRAND.into(), strand))?;
    df.with_column(Column::new(GENE_TSS.into(), tss))?;
    df.with_column(Column::new(BIOTYPE.into(), biotype))?;

    let dropped = keep.iter().filter(|kept| !**kept).count();
    if dropped == 0 {
        info!(rows = height, "added gene information");
        return Ok((df, 0));
    }
    warn!(
        rows = dropped,
        "genes missing strand and TSS information, dropping rows"
    );
    let joined = retain_rows(&df, &keep)?;
    info!(rows = joined.height(), "added gene information");
    Ok((joined, dropped))
}

/// Recompute `distance = |start - gene_tss|`; null where either side is null.
pub fn compute_distance(mut df: DataFrame) -> Result<DataFrame> {
    let start = integers(&df, START)?;
    let tss = integers(&df, GENE_TSS)?;
    let distance: Vec<Option<i64>> = start
        .iter()
        .zip(&tss)
        .map(|(start, tss)| Some((start.as_ref()? - tss.as_ref()?).abs()))
        .collect();
    df.with_column(Column::new(DISTANCE.into(), distance))?;
    Ok(df)
}
