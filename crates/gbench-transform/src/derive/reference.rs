use gbench_ingest::SequenceSource;
use gbench_model::columns::{CHR, REF, START};
use polars::prelude::DataFrame;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::table::{integers, strings};

/// Agreement between the `ref` column and the reference genome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReferenceMatchReport {
    /// Rows compared; excludes rows that could not be fetched.
    pub total: usize,
    pub matching: usize,
    pub mismatching: usize,
    /// Rows whose base could not be fetched.
    pub failed: usize,
    pub match_rate: f64,
    pub mismatch_rate: f64,
}

enum Check {
    Match,
    Mismatch,
    Failed,
}

/// Compare each `ref` allele against the single genome base at `start`
/// (1-based), case-insensitively. A multi-base allele never matches.
///
/// Lookup failures are logged and left out of the rates. The frame is not
/// modified.
pub fn verify_reference_alleles(
    df: &DataFrame,
    genome: &dyn SequenceSource,
) -> Result<ReferenceMatchReport> {
    let chr = strings(df, CHR)?;
    let start = integers(df, START)?;
    let ref_allele = strings(df, REF)?;

    let checks: Vec<Check> = (0..df.height())
        .into_par_iter()
        .map(|row| check_row(genome, row, &chr[row], start[row], &ref_allele[row]))
        .collect();

    let mut report = ReferenceMatchReport::default();
    for check in checks {
        match check {
            Check::Match => report.matching += 1,
            Check::Mismatch => report.mismatching += 1,
            Check::Failed => report.failed += 1,
        }
    }
    report.total = report.matching + report.mismatching;
    if report.total > 0 {
        report.match_rate = report.matching as f64 / report.total as f64;
        report.mismatch_rate = report.mismatching as f64 / report.total as f64;
    }

    info!(
        total = report.total,
        matching = report.matching,
        mismatching = report.mismatching,
        failed = report.failed,
        match_rate = report.match_rate,
        "reference allele check"
    );
    Ok(report)
}

fn check_row(
    genome: &dyn SequenceSource,
    row: usize,
    chr: &Option<String>,
    start: Option<i64>,
    ref_allele: &Option<String>,
) -> Check {
    let (Some(chr), Some(start), Some(ref_allele)) = (chr, start, ref_allele) else {
        warn!(row, "incomplete variant row, skipping reference check");
        return Check::Failed;
    };
    let Some(position) = u64::try_from(start).ok().filter(|p| *p >= 1) else {
        warn!(row, chr = %chr, start, "position before sequence start");
        return Check::Failed;
    };
    match genome.fetch(chr, position - 1, position) {
        Ok(base) if base.eq_ignore_ascii_case(ref_allele) => Check::Match,
        Ok(_) => Check::Mismatch,
        Err(err) => {
            warn!(row, chr = %chr, start, error = %err, "reference lookup failed");
            Check::Failed
        }
    }
}
