use gbench_model::TaskKind;
use gbench_transform::{
    DatasetFrame, EnhancerDeriver, FeatureDeriver, filter_by_distance, normalize, select_present,
};
use tracing::info;

use super::{DatasetProcessor, ProcessReport, run_stage};
use crate::context::ProcessContext;
use crate::error::Result;

/// Enhancer–gene pairs: strand lookup and an optional distance window.
///
/// The published `distance` column is kept as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnhancerProcessor;

impl DatasetProcessor for EnhancerProcessor {
    fn task(&self) -> TaskKind {
        TaskKind::Enhancer
    }

    fn description(&self) -> &'static str {
        "Enhancer-gene pairs with strand and distance window"
    }

    fn process(
        &self,
        frame: &mut DatasetFrame,
        context: &ProcessContext<'_>,
    ) -> Result<ProcessReport> {
        let mut report = ProcessReport {
            rows_in: frame.record_count(),
            ..ProcessReport::default()
        };

        run_stage(frame, "normalize", |df| normalize(&df, context.schema))?;

        if let Some(annotation) = context.annotation {
            let deriver = EnhancerDeriver;
            run_stage(frame, deriver.name(), |df| {
                let derived = deriver.derive(df, annotation)?;
                report.derive = Some(derived.stats);
                Ok(derived.data)
            })?;
        }

        if let Some(window) = context.options.window {
            run_stage(frame, "filter_by_distance", |df| filter_by_distance(&df, window))?;
        }

        run_stage(frame, "select_columns", |df| {
            select_present(&df, context.export_columns)
        })?;

        report.rows_out = frame.record_count();
        info!(
            dataset = %frame.dataset,
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            "processed enhancer dataset"
        );
        Ok(report)
    }
}
