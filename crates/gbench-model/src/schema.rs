//! Canonical schema description for one (task, dataset) pair.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::enums::FileFormat;
use crate::error::{ModelError, Result};

/// How a source table maps onto the canonical columns.
///
/// `column_mapping` is keyed by canonical name. Canonical columns without an
/// entry are expected under their own name in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub canonical_columns: Vec<String>,
    #[serde(default)]
    pub column_mapping: BTreeMap<String, String>,
    pub file_format: FileFormat,
}

impl SchemaConfig {
    /// Schema whose source already uses the canonical names.
    pub fn identity<I, S>(columns: I, file_format: FileFormat) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            canonical_columns: columns.into_iter().map(Into::into).collect(),
            column_mapping: BTreeMap::new(),
            file_format,
        }
    }

    /// Add a `canonical <- source` rename.
    #[must_use]
    pub fn with_mapping(mut self, canonical: impl Into<String>, source: impl Into<String>) -> Self {
        self.column_mapping.insert(canonical.into(), source.into());
        self
    }

    /// Source column name that feeds a canonical column.
    pub fn source_for<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.column_mapping
            .get(canonical)
            .map(String::as_str)
            .unwrap_or(canonical)
    }

    /// Check the invariants the normalizer relies on.
    ///
    /// Canonical names are unique, every mapping key is a canonical column,
    /// and no two canonical columns read from the same source column.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for column in &self.canonical_columns {
            if !seen.insert(column.as_str()) {
                return Err(ModelError::InvalidSchema {
                    message: format!("duplicate canonical column '{column}'"),
                });
            }
        }
        for key in self.column_mapping.keys() {
            if !seen.contains(key.as_str()) {
                return Err(ModelError::InvalidSchema {
                    message: format!("mapping key '{key}' is not a canonical column"),
                });
            }
        }
        let mut sources: BTreeMap<&str, &str> = BTreeMap::new();
        for column in &self.canonical_columns {
            let source = self.source_for(column);
            if let Some(previous) = sources.insert(source, column.as_str()) {
                return Err(ModelError::InvalidSchema {
                    message: format!(
                        "source column '{source}' feeds both '{previous}' and '{column}'"
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eqtl_schema() -> SchemaConfig {
        SchemaConfig::identity(["variant_id", "gene_name", "score"], FileFormat::Parquet)
            .with_mapping("score", "pip")
    }

    #[test]
    fn source_for_falls_back_to_identity() {
        let schema = eqtl_schema();
        assert_eq!(schema.source_for("score"), "pip");
        assert_eq!(schema.source_for("gene_name"), "gene_name");
    }

    #[test]
    fn validate_accepts_well_formed_schema() {
        assert!(eqtl_schema().validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_mapping_key() {
        let schema = eqtl_schema().with_mapping("pvalue", "pval_nominal");
        assert!(matches!(
            schema.validate(),
            Err(ModelError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn validate_rejects_colliding_sources() {
        let schema = SchemaConfig::identity(["score", "pip"], FileFormat::Tsv)
            .with_mapping("score", "pip");
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("'pip'"));
    }

    #[test]
    fn validate_rejects_duplicate_columns() {
        let schema = SchemaConfig::identity(["chr", "chr"], FileFormat::Tsv);
        assert!(schema.validate().is_err());
    }
}
