//! Minimal VCF export of labeled variants.
//!
//! Positives and negatives go to separate files so downstream tools can
//! score each class directly. Only the fixed columns plus three annotation
//! columns are written; there is no INFO or sample data.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use gbench_common::{any_to_f64, any_to_i64, any_to_string, has_column};
use gbench_model::Label;
use gbench_model::columns::{ALT, CHR, DISTANCE, GENE_NAME, LABEL, REF, START, STRAND};
use polars::prelude::{AnyValue, Column, DataFrame};
use tracing::info;

pub const POSITIVE_VCF: &str = "positive.vcf";
pub const NEGATIVE_VCF: &str = "negative.vcf";
pub const SUMMARY_FILE: &str = "vcf_summary.txt";

pub const VCF_HEADER: &str = "##fileformat=VCFv4.2\n\
    #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tDISTANCE\tSTRAND\tGENE\n";

const REQUIRED_COLUMNS: [&str; 8] = [CHR, START, REF, ALT, DISTANCE, STRAND, GENE_NAME, LABEL];

/// Files and counts from one VCF export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcfExport {
    pub positive: PathBuf,
    pub negative: PathBuf,
    pub summary: PathBuf,
    pub positive_count: usize,
    pub negative_count: usize,
}

impl VcfExport {
    pub fn total(&self) -> usize {
        self.positive_count + self.negative_count
    }
}

/// Write `positive.vcf`, `negative.vcf` and `vcf_summary.txt` under `dir`.
///
/// Rows are split on `label`; rows with any other label value are skipped.
pub fn write_minimal_vcf(df: &DataFrame, dir: &Path) -> Result<VcfExport> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !has_column(df, name))
        .collect();
    if !missing.is_empty() {
        return Err(anyhow!(
            "VCF export requires columns: missing {}",
            missing.join(", ")
        ));
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create VCF output directory {}", dir.display()))?;

    let columns = REQUIRED_COLUMNS
        .iter()
        .map(|name| df.column(name))
        .collect::<std::result::Result<Vec<&Column>, _>>()?;
    let label_column = columns[7];

    let positive = dir.join(POSITIVE_VCF);
    let negative = dir.join(NEGATIVE_VCF);
    let mut positive_out = open_vcf(&positive)?;
    let mut negative_out = open_vcf(&negative)?;
    let (mut positive_count, mut negative_count) = (0, 0);

    for row in 0..df.height() {
        let label = any_to_i64(label_column.get(row)?).and_then(Label::from_i64);
        let (out, path) = match label {
            Some(Label::Positive) => {
                positive_count += 1;
                (&mut positive_out, &positive)
            }
            Some(Label::Negative) => {
                negative_count += 1;
                (&mut negative_out, &negative)
            }
            None => continue,
        };
        let line = vcf_line(&columns, row)?;
        writeln!(out, "{line}").with_context(|| format!("write {}", path.display()))?;
    }
    positive_out
        .flush()
        .with_context(|| format!("write {}", positive.display()))?;
    negative_out
        .flush()
        .with_context(|| format!("write {}", negative.display()))?;

    let export = VcfExport {
        summary: dir.join(SUMMARY_FILE),
        positive,
        negative,
        positive_count,
        negative_count,
    };
    std::fs::write(&export.summary, summary_text(&export))
        .with_context(|| format!("write {}", export.summary.display()))?;

    info!(
        positive = export.positive_count,
        negative = export.negative_count,
        dir = %dir.display(),
        "wrote VCF files"
    );
    Ok(export)
}

fn open_vcf(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(VCF_HEADER.as_bytes())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(writer)
}

/// `CHROM POS ID REF ALT QUAL FILTER DISTANCE STRAND GENE` for one row.
fn vcf_line(columns: &[&Column], row: usize) -> Result<String> {
    let text = |idx: usize| -> Result<String> { Ok(any_to_string(columns[idx].get(row)?)) };
    let distance = match columns[4].get(row)? {
        AnyValue::Null => ".".to_string(),
        value => any_to_f64(value)
            .map(|d| format!("{}", d.trunc() as i64))
            .ok_or_else(|| anyhow!("row {row}: distance is not numeric"))?,
    };
    Ok(format!(
        "{chr}\t{pos}\t.\t{ref_allele}\t{alt}\t.\tPASS\t{distance}\t{strand}\t{gene}",
        chr = text(0)?,
        pos = text(1)?,
        ref_allele = text(2)?,
        alt = text(3)?,
        strand = text(5)?,
        gene = text(6)?,
    ))
}

fn summary_text(export: &VcfExport) -> String {
    format!(
        "Positive samples: {}\nNegative samples: {}\nTotal samples: {}\n\nFiles:\n\
         Positive VCF: {}\nNegative VCF: {}\n",
        export.positive_count,
        export.negative_count,
        export.total(),
        export.positive.display(),
        export.negative.display(),
    )
}
