//! Column access and row masking shared by the stages.

use gbench_common::{column_f64, column_i64, column_strings, has_column};
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::info;

use crate::error::{Result, TransformError};

pub(crate) fn require_column(df: &DataFrame, name: &str) -> Result<()> {
    if has_column(df, name) {
        Ok(())
    } else {
        Err(TransformError::missing_column(name))
    }
}

pub(crate) fn strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    require_column(df, name)?;
    Ok(column_strings(df, name)?)
}

pub(crate) fn integers(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    require_column(df, name)?;
    Ok(column_i64(df, name)?)
}

pub(crate) fn floats(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    require_column(df, name)?;
    Ok(column_f64(df, name)?)
}

/// Keep the rows whose mask entry is true, in order.
pub(crate) fn retain_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Filter with a mask and log the row counts under `stage`.
pub(crate) fn filter_logged(df: &DataFrame, keep: &[bool], stage: &str) -> Result<DataFrame> {
    let before = df.height();
    let filtered = retain_rows(df, keep)?;
    info!(
        stage,
        before,
        after = filtered.height(),
        "filtered rows"
    );
    Ok(filtered)
}
