//! Output column projection.

use gbench_common::has_column;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::Result;

/// Keep the listed columns that exist, in list order.
///
/// Absent names are skipped so one export list serves frames with and
/// without the optional derived columns.
pub fn select_present<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<DataFrame> {
    let present: Vec<&str> = columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| has_column(df, name))
        .collect();
    if present.len() < columns.len() {
        debug!(
            requested = columns.len(),
            present = present.len(),
            "export columns not all present"
        );
    }
    Ok(df.select(present)?)
}
