//! Variant and gene annotation records.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enums::Strand;
use crate::error::ModelError;

const VARIANT_DELIMITER: char = '_';

/// A variant decomposed from a compound `chr_pos_ref_alt_build` identifier.
///
/// # Examples
///
/// ```
/// use gbench_model::Variant;
///
/// let variant: Variant = "chr1_1291731_TG_T_b38".parse().unwrap();
/// assert_eq!(variant.chr, "chr1");
/// assert_eq!(variant.pos, 1291731);
/// assert_eq!(variant.ref_allele, "TG");
/// assert_eq!(variant.alt_allele, "T");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub chr: String,
    /// 1-based position as written in the identifier.
    pub pos: i64,
    pub ref_allele: String,
    pub alt_allele: String,
}

/// True when `ref_allele` and `alt_allele` are each exactly one base.
pub fn is_snp(ref_allele: &str, alt_allele: &str) -> bool {
    let single_base = |allele: &str| allele.chars().count() == 1;
    single_base(ref_allele) && single_base(alt_allele)
}

impl FromStr for Variant {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(VARIANT_DELIMITER).collect();
        let parse_error = |reason: &str| ModelError::VariantParse {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        if fields.len() < 4 {
            return Err(parse_error(&format!(
                "expected at least 4 '{VARIANT_DELIMITER}'-delimited fields, found {}",
                fields.len()
            )));
        }
        if fields[..4].iter().any(|field| field.is_empty()) {
            return Err(parse_error("empty field"));
        }
        let pos = fields[1]
            .parse::<i64>()
            .map_err(|_| parse_error(&format!("position '{}' is not an integer", fields[1])))?;
        Ok(Self {
            chr: fields[0].to_string(),
            pos,
            ref_allele: fields[2].to_string(),
            alt_allele: fields[3].to_string(),
        })
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}>{}",
            self.chr, self.pos, self.ref_allele, self.alt_allele
        )
    }
}

/// One `gene` feature from an annotation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub chr: String,
    /// 1-based inclusive start.
    pub start: i64,
    /// 1-based inclusive end.
    pub end: i64,
    pub strand: Strand,
    pub biotype: Option<String>,
}

impl GeneRecord {
    /// Transcription start site: gene start on `+`, gene end on `-`.
    pub fn tss(&self) -> i64 {
        match self.strand {
            Strand::Plus => self.start,
            Strand::Minus => self.end,
        }
    }
}

/// Gene name -> gene record, first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct GeneAnnotation {
    genes: HashMap<String, GeneRecord>,
}

impl GeneAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a gene unless the name is already present.
    ///
    /// Returns false for a duplicate name, leaving the first record in place.
    pub fn insert_first(&mut self, gene_name: impl Into<String>, record: GeneRecord) -> bool {
        match self.genes.entry(gene_name.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn get(&self, gene_name: &str) -> Option<&GeneRecord> {
        self.genes.get(gene_name)
    }

    pub fn strand(&self, gene_name: &str) -> Option<Strand> {
        self.genes.get(gene_name).map(|gene| gene.strand)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, GeneRecord)> for GeneAnnotation {
    fn from_iter<T: IntoIterator<Item = (S, GeneRecord)>>(iter: T) -> Self {
        let mut annotation = Self::new();
        for (name, record) in iter {
            annotation.insert_first(name, record);
        }
        annotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(strand: Strand) -> GeneRecord {
        GeneRecord {
            chr: "chr1".to_string(),
            start: 1000,
            end: 5000,
            strand,
            biotype: Some("protein_coding".to_string()),
        }
    }

    #[test]
    fn parses_compound_identifier() {
        let variant: Variant = "chr1_1291731_TG_T_b38".parse().expect("parse variant");
        assert_eq!(
            variant,
            Variant {
                chr: "chr1".to_string(),
                pos: 1291731,
                ref_allele: "TG".to_string(),
                alt_allele: "T".to_string(),
            }
        );
        assert!(!is_snp(&variant.ref_allele, &variant.alt_allele));
    }

    #[test]
    fn accepts_identifier_without_build_suffix() {
        let variant: Variant = "chr2_100_A_G".parse().expect("parse variant");
        assert!(is_snp(&variant.ref_allele, &variant.alt_allele));
    }

    #[test]
    fn snp_counts_characters_not_bytes() {
        assert!(is_snp("a", "\u{e9}"));
        assert!(!is_snp("", "A"));
        assert!(!is_snp("AT", "A"));
    }

    #[test]
    fn rejects_short_identifier() {
        let err = "chr1_1291731_TG".parse::<Variant>().unwrap_err();
        assert!(matches!(err, ModelError::VariantParse { .. }));
        assert!(err.to_string().contains("chr1_1291731_TG"));
    }

    #[test]
    fn rejects_non_integer_position() {
        assert!("chr1_pos_A_G_b38".parse::<Variant>().is_err());
        assert!("chr1__A_G_b38".parse::<Variant>().is_err());
    }

    #[test]
    fn tss_depends_on_strand() {
        assert_eq!(gene(Strand::Plus).tss(), 1000);
        assert_eq!(gene(Strand::Minus).tss(), 5000);
    }

    #[test]
    fn annotation_keeps_first_occurrence() {
        let annotation: GeneAnnotation = vec![
            ("GENE1", gene(Strand::Minus)),
            ("GENE1", gene(Strand::Plus)),
            ("GENE2", gene(Strand::Plus)),
        ]
        .into_iter()
        .collect();
        assert_eq!(annotation.len(), 2);
        assert_eq!(annotation.strand("GENE1"), Some(Strand::Minus));
        assert_eq!(annotation.strand("MISSING"), None);
    }
}
