//! Ranking metrics of a score column against binary labels.

use gbench_common::{any_to_f64, any_to_string, column_f64, has_column};
use gbench_model::Label;
use gbench_model::columns::LABEL;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{MetricError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricReport {
    pub auroc: f64,
    pub auprc: f64,
    /// Rows with both a score and a label.
    pub n_samples: usize,
    pub n_positive: usize,
}

/// AUROC and AUPRC of `score_column` against `label`.
///
/// Rows missing either value are ignored. Both classes must remain.
pub fn evaluate(df: &DataFrame, score_column: &str) -> Result<MetricReport> {
    let pairs = scored_labels(df, score_column)?;
    let n_positive = pairs.iter().filter(|(_, label)| *label == Label::Positive).count();
    let n_negative = pairs.len() - n_positive;
    if n_positive == 0 || n_negative == 0 {
        return Err(MetricError::DegenerateLabelSet {
            positives: n_positive,
            negatives: n_negative,
        });
    }

    let report = MetricReport {
        auroc: auroc(&pairs),
        auprc: average_precision(&pairs),
        n_samples: pairs.len(),
        n_positive,
    };
    info!(
        score_column,
        auroc = report.auroc,
        auprc = report.auprc,
        samples = report.n_samples,
        "evaluated scores"
    );
    Ok(report)
}

fn scored_labels(df: &DataFrame, score_column: &str) -> Result<Vec<(f64, Label)>> {
    for column in [score_column, LABEL] {
        if !has_column(df, column) {
            return Err(MetricError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    let scores = column_f64(df, score_column)?;
    let labels = df.column(LABEL)?;

    let mut pairs = Vec::with_capacity(scores.len());
    for (row, score) in scores.into_iter().enumerate() {
        let Some(score) = score else {
            continue;
        };
        let value = labels.get(row)?;
        if value.is_null() {
            continue;
        }
        let label = any_to_f64(value.clone())
            .filter(|v| v.fract() == 0.0)
            .and_then(|v| Label::from_i64(v as i64))
            .ok_or_else(|| MetricError::InvalidLabel {
                row,
                value: any_to_string(value),
            })?;
        pairs.push((score, label));
    }
    let skipped = df.height() - pairs.len();
    if skipped > 0 {
        debug!(skipped, "rows without score or label");
    }
    Ok(pairs)
}

/// Mann-Whitney U over average ranks, normalized by `P * N`.
fn auroc(pairs: &[(f64, Label)]) -> f64 {
    let mut order: Vec<usize> = (0..pairs.len()).collect();
    order.sort_by(|a, b| pairs[*a].0.total_cmp(&pairs[*b].0));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && pairs[order[end]].0 == pairs[order[start]].0 {
            end += 1;
        }
        // Ranks are 1-based; a tie group shares the mean of its ranks.
        let rank = (start + 1 + end) as f64 / 2.0;
        let positives = order[start..end]
            .iter()
            .filter(|idx| pairs[**idx].1 == Label::Positive)
            .count();
        positive_rank_sum += rank * positives as f64;
        start = end;
    }

    let n_pos = pairs.iter().filter(|(_, l)| *l == Label::Positive).count() as f64;
    let n_neg = pairs.len() as f64 - n_pos;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}

/// Step-wise average precision: `sum (R_k - R_{k-1}) * P_k` over distinct
/// score thresholds, highest first.
fn average_precision(pairs: &[(f64, Label)]) -> f64 {
    let mut order: Vec<usize> = (0..pairs.len()).collect();
    order.sort_by(|a, b| pairs[*b].0.total_cmp(&pairs[*a].0));

    let n_pos = pairs.iter().filter(|(_, l)| *l == Label::Positive).count() as f64;
    let (mut tp, mut fp) = (0.0, 0.0);
    let mut previous_recall = 0.0;
    let mut precision_sum = 0.0;
    let mut idx = 0;
    while idx < order.len() {
        let threshold = pairs[order[idx]].0;
        while idx < order.len() && pairs[order[idx]].0 == threshold {
            match pairs[order[idx]].1 {
                Label::Positive => tp += 1.0,
                Label::Negative => fp += 1.0,
            }
            idx += 1;
        }
        let recall = tp / n_pos;
        let precision = tp / (tp + fp);
        precision_sum += (recall - previous_recall) * precision;
        previous_recall = recall;
    }
    precision_sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn matches_reference_values() {
        // sklearn: roc_auc_score = 0.75, average_precision_score = 0.8333...
        let df = df!(
            "score" => [0.1, 0.4, 0.35, 0.8],
            "label" => [0i64, 0, 1, 1],
        )
        .unwrap();
        let report = evaluate(&df, "score").unwrap();
        assert_close(report.auroc, 0.75);
        assert_close(report.auprc, 5.0 / 6.0);
        assert_eq!(report.n_samples, 4);
        assert_eq!(report.n_positive, 2);
    }

    #[test]
    fn ties_use_average_rank() {
        let df = df!(
            "score" => [0.5, 0.5, 0.5, 0.5],
            "label" => [0i64, 1, 0, 1],
        )
        .unwrap();
        let report = evaluate(&df, "score").unwrap();
        assert_close(report.auroc, 0.5);
        assert_close(report.auprc, 0.5);
    }

    #[test]
    fn perfect_separation() {
        let df = df!(
            "score" => [3.0, 2.0, 1.0, 0.0],
            "label" => [1i64, 1, 0, 0],
        )
        .unwrap();
        let report = evaluate(&df, "score").unwrap();
        assert_close(report.auroc, 1.0);
        assert_close(report.auprc, 1.0);
    }

    #[test]
    fn null_rows_are_ignored() {
        let df = df!(
            "score" => [Some(0.1), None, Some(0.35), Some(0.8), Some(0.4)],
            "label" => [Some(0i64), Some(1), Some(1), Some(1), None],
        )
        .unwrap();
        let report = evaluate(&df, "score").unwrap();
        assert_eq!(report.n_samples, 3);
        assert_close(report.auroc, 1.0);
    }

    #[test]
    fn single_class_is_degenerate() {
        let df = df!("score" => [0.1, 0.9], "label" => [1i64, 1]).unwrap();
        let err = evaluate(&df, "score").unwrap_err();
        assert!(matches!(
            err,
            MetricError::DegenerateLabelSet {
                positives: 2,
                negatives: 0
            }
        ));
    }

    #[test]
    fn empty_table_is_degenerate() {
        let df = df!("score" => Vec::<f64>::new(), "label" => Vec::<i64>::new()).unwrap();
        assert!(matches!(
            evaluate(&df, "score"),
            Err(MetricError::DegenerateLabelSet {
                positives: 0,
                negatives: 0
            })
        ));
    }

    #[test]
    fn missing_score_column_is_named() {
        let df = df!("label" => [1i64, 0]).unwrap();
        let err = evaluate(&df, "ABC Score").unwrap_err();
        assert_eq!(err.to_string(), "missing column 'ABC Score'");
    }

    #[test]
    fn unscored_rows_skip_label_validation() {
        let df = df!(
            "score" => [Some(0.9), None, Some(0.1)],
            "label" => [1i64, 2, 0],
        )
        .unwrap();
        let report = evaluate(&df, "score").unwrap();
        assert_eq!(report.n_samples, 2);
        assert_close(report.auroc, 1.0);
    }

    #[test]
    fn non_binary_label_is_rejected() {
        let df = df!("score" => [0.1, 0.2], "label" => [0i64, 2]).unwrap();
        assert!(matches!(
            evaluate(&df, "score"),
            Err(MetricError::InvalidLabel { row: 1, .. })
        ));
    }
}
