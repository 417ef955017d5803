//! Gene annotation from GTF files.
//!
//! Only `gene` features are kept. Names come from the `gene_name` attribute
//! and biotypes from `gene_type` (GENCODE) or `gene_biotype` (Ensembl). The
//! first record for a name wins. Gzip-compressed files are read directly.

use std::collections::HashMap;
use std::path::Path;

use gbench_model::{GeneAnnotation, GeneRecord, Strand};
use tracing::{info, warn};

use crate::compression::open_text;
use crate::error::{IngestError, Result};

const GTF_FIELDS: usize = 9;
const GENE_FEATURE: &str = "gene";
const BIOTYPE_KEYS: [&str; 2] = ["gene_type", "gene_biotype"];

/// Counters from one annotation load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GtfLoadStats {
    pub gene_records: usize,
    pub duplicates: usize,
    pub missing_name: usize,
    pub unstranded: usize,
}

/// Load the gene table from a GTF file.
pub fn load_gene_annotation(path: &Path) -> Result<GeneAnnotation> {
    load_gene_annotation_with_stats(path).map(|(annotation, _)| annotation)
}

/// Load the gene table and report how many records were skipped.
pub fn load_gene_annotation_with_stats(path: &Path) -> Result<(GeneAnnotation, GtfLoadStats)> {
    let reader = open_text(path)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut annotation = GeneAnnotation::new();
    let mut stats = GtfLoadStats::default();
    let mut record = csv::StringRecord::new();

    loop {
        let more = csv_reader.read_record(&mut record).map_err(|e| IngestError::Gtf {
            path: path.to_path_buf(),
            line: e.position().map_or(0, csv::Position::line),
            message: e.to_string(),
        })?;
        if !more {
            break;
        }
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() < GTF_FIELDS {
            return Err(gtf_error(
                path,
                line,
                format!("expected {GTF_FIELDS} fields, found {}", record.len()),
            ));
        }
        if &record[2] != GENE_FEATURE {
            continue;
        }
        stats.gene_records += 1;

        let attributes = parse_attributes(&record[8]);
        let Some(name) = attributes.get("gene_name").filter(|n| !n.is_empty()) else {
            stats.missing_name += 1;
            continue;
        };
        let Ok(strand) = record[6].parse::<Strand>() else {
            stats.unstranded += 1;
            continue;
        };
        let start = parse_coordinate(path, line, "start", &record[3])?;
        let end = parse_coordinate(path, line, "end", &record[4])?;
        let biotype = BIOTYPE_KEYS
            .iter()
            .find_map(|key| attributes.get(*key))
            .map(|value| (*value).to_string());

        let gene = GeneRecord {
            chr: record[0].to_string(),
            start,
            end,
            strand,
            biotype,
        };
        if !annotation.insert_first(*name, gene) {
            stats.duplicates += 1;
        }
    }

    if stats.missing_name > 0 || stats.unstranded > 0 {
        warn!(
            path = %path.display(),
            missing_name = stats.missing_name,
            unstranded = stats.unstranded,
            "skipped gene records"
        );
    }
    info!(
        path = %path.display(),
        genes = annotation.len(),
        duplicates = stats.duplicates,
        "loaded gene annotation"
    );
    Ok((annotation, stats))
}

/// Parse a GTF attribute column: `key "value"; key "value";`.
///
/// Values may be unquoted. Repeated keys keep their first value.
pub fn parse_attributes(column: &str) -> HashMap<&str, &str> {
    let mut attributes = HashMap::new();
    for part in column.split(';') {
        let trimmed = part.trim();
        let Some((key, value)) = trimmed.split_once(char::is_whitespace) else {
            continue;
        };
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        attributes.entry(key).or_insert(value);
    }
    attributes
}

fn parse_coordinate(path: &Path, line: u64, field: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| gtf_error(path, line, format!("{field} '{value}' is not an integer")))
}

fn gtf_error(path: &Path, line: u64, message: String) -> IngestError {
    IngestError::Gtf {
        path: path.to_path_buf(),
        line,
        message,
    }
}
