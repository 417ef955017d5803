//! Class balance of a labeled table.

use std::collections::BTreeMap;

use gbench_common::{column_i64, has_column};
use gbench_model::columns::LABEL;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::error::{MetricError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelDistribution {
    /// All rows, including those without a label.
    pub total: usize,
    pub counts: BTreeMap<i64, usize>,
    /// Share of labeled rows per label, in percent.
    pub percentages: BTreeMap<i64, f64>,
    /// Positives over negatives; 0 when either class is absent.
    pub positive_negative_ratio: f64,
}

pub fn label_distribution(df: &DataFrame) -> Result<LabelDistribution> {
    if !has_column(df, LABEL) {
        return Err(MetricError::MissingColumn {
            column: LABEL.to_string(),
        });
    }
    let mut counts = BTreeMap::new();
    for label in column_i64(df, LABEL)?.into_iter().flatten() {
        *counts.entry(label).or_insert(0) += 1;
    }

    let labeled: usize = counts.values().sum();
    let percentages = counts
        .iter()
        .map(|(label, count)| (*label, *count as f64 / labeled as f64 * 100.0))
        .collect();
    let positive_negative_ratio = match (counts.get(&1), counts.get(&0)) {
        (Some(positives), Some(negatives)) => *positives as f64 / *negatives as f64,
        _ => 0.0,
    };

    Ok(LabelDistribution {
        total: df.height(),
        counts,
        percentages,
        positive_negative_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn counts_and_ratio() {
        let df = df!("label" => [Some(1i64), Some(0), Some(0), Some(0), None]).unwrap();
        let distribution = label_distribution(&df).unwrap();
        assert_eq!(distribution.total, 5);
        assert_eq!(distribution.counts, BTreeMap::from([(0, 3), (1, 1)]));
        assert_eq!(distribution.percentages[&0], 75.0);
        assert_eq!(distribution.percentages[&1], 25.0);
        assert!((distribution.positive_negative_ratio - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn single_class_ratio_is_zero() {
        let df = df!("label" => [1i64, 1]).unwrap();
        let distribution = label_distribution(&df).unwrap();
        assert_eq!(distribution.positive_negative_ratio, 0.0);
        assert_eq!(distribution.percentages[&1], 100.0);
    }

    #[test]
    fn requires_label_column() {
        let df = df!("score" => [0.5]).unwrap();
        assert!(matches!(
            label_distribution(&df),
            Err(MetricError::MissingColumn { .. })
        ));
    }
}
