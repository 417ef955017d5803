//! Metric invariants over arbitrary score vectors.

use gbench_report::{evaluate, label_distribution};
use polars::prelude::*;
use proptest::prelude::*;

fn table(scores: &[f64], labels: &[i64]) -> DataFrame {
    df!("score" => scores, "label" => labels).unwrap()
}

proptest! {
    /// Property: both metrics stay in [0, 1]
    #[test]
    fn prop_metrics_are_bounded(
        rows in prop::collection::vec((0.0f64..1.0, 0i64..2), 2..100),
    ) {
        let (scores, mut labels): (Vec<f64>, Vec<i64>) = rows.into_iter().unzip();
        // Guarantee both classes.
        labels[0] = 0;
        labels[1] = 1;
        let report = evaluate(&table(&scores, &labels), "score").unwrap();
        prop_assert!((0.0..=1.0).contains(&report.auroc));
        prop_assert!((0.0..=1.0).contains(&report.auprc));
        prop_assert_eq!(report.n_samples, scores.len());
    }

    /// Property: negating the scores mirrors AUROC around 0.5
    #[test]
    fn prop_auroc_flips_with_score_order(
        rows in prop::collection::vec((0.0f64..1.0, 0i64..2), 2..100),
    ) {
        let (scores, mut labels): (Vec<f64>, Vec<i64>) = rows.into_iter().unzip();
        labels[0] = 0;
        labels[1] = 1;
        let negated: Vec<f64> = scores.iter().map(|s| -s).collect();
        let forward = evaluate(&table(&scores, &labels), "score").unwrap();
        let reverse = evaluate(&table(&negated, &labels), "score").unwrap();
        prop_assert!((forward.auroc + reverse.auroc - 1.0).abs() < 1e-9);
    }
}

#[test]
fn distribution_serializes_for_reports() {
    let df = df!("label" => [1i64, 0, 0, 1]).unwrap();
    let distribution = label_distribution(&df).unwrap();
    let json = serde_json::to_value(&distribution).unwrap();
    assert_eq!(json["total"], 4);
    assert_eq!(json["counts"]["1"], 2);
    assert_eq!(json["positive_negative_ratio"], 1.0);
}
