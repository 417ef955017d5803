//! Binary labels from a continuous score.

use gbench_model::columns::{LABEL, SCORE};
use gbench_model::{Label, LabelThresholds};
use polars::prelude::{Column, DataFrame};
use tracing::info;

use crate::error::Result;
use crate::table::{floats, retain_rows};

/// Add an integer `label` column from `score` and drop the rest.
///
/// Rows scoring at or above the positive threshold get 1, rows at or below
/// the negative threshold get 0. Ambiguous and null scores are removed.
pub fn assign_labels(df: &DataFrame, thresholds: LabelThresholds) -> Result<DataFrame> {
    let labels: Vec<Option<Label>> = floats(df, SCORE)?
        .into_iter()
        .map(|score| score.and_then(|s| thresholds.classify(s)))
        .collect();

    let keep: Vec<bool> = labels.iter().map(Option::is_some).collect();
    let values: Vec<i64> = labels.iter().flatten().map(|label| label.as_i64()).collect();
    let positives = values.iter().filter(|v| **v == 1).count();

    let mut labeled = retain_rows(df, &keep)?;
    labeled.with_column(Column::new(LABEL.into(), values))?;

    info!(
        positive = positives,
        negative = labeled.height() - positives,
        dropped = df.height() - labeled.height(),
        positive_threshold = thresholds.positive(),
        negative_threshold = thresholds.negative(),
        "assigned labels"
    );
    Ok(labeled)
}
