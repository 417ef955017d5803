//! Map a source table onto the canonical schema.

use gbench_common::has_column;
use gbench_model::SchemaConfig;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{Result, TransformError};

/// Rename source columns to canonical names and project to the canonical set.
///
/// Output columns follow `schema.canonical_columns` order. Columns the schema
/// does not reference are dropped. Every canonical column whose source is
/// absent is reported at once. Rows are untouched.
pub fn normalize(df: &DataFrame, schema: &SchemaConfig) -> Result<DataFrame> {
    schema.validate()?;

    let missing: Vec<String> = schema
        .canonical_columns
        .iter()
        .filter(|canonical| !has_column(df, schema.source_for(canonical)))
        .map(|canonical| match schema.source_for(canonical) {
            source if source == canonical.as_str() => canonical.clone(),
            source => format!("{canonical} (from '{source}')"),
        })
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::SchemaMismatch { missing });
    }

    let mut columns = Vec::with_capacity(schema.canonical_columns.len());
    for canonical in &schema.canonical_columns {
        let mut column = df.column(schema.source_for(canonical))?.clone();
        column.rename(canonical.as_str().into());
        columns.push(column);
    }
    let normalized = DataFrame::new(columns)?;

    debug!(
        rows = normalized.height(),
        dropped_columns = df.width().saturating_sub(normalized.width()),
        "normalized table"
    );
    Ok(normalized)
}
