use gbench_model::TaskKind;
use gbench_transform::{
    DatasetFrame, EqtlDeriver, FeatureDeriver, assign_labels, filter_by_distance,
    filter_protein_coding, filter_snp_only, normalize, parse_variants, select_present,
    verify_reference_alleles,
};
use tracing::info;

use super::{DatasetProcessor, ProcessReport, run_stage, stage_error};
use crate::context::ProcessContext;
use crate::error::Result;

/// Fine-mapped eQTLs: variant decomposition, gene join, filters and labels.
///
/// Without an annotation only the variant columns are derived, so the
/// distance window and protein-coding filter need one.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqtlProcessor;

impl DatasetProcessor for EqtlProcessor {
    fn task(&self) -> TaskKind {
        TaskKind::Eqtl
    }

    fn description(&self) -> &'static str {
        "Fine-mapped eQTLs labeled by posterior inclusion probability"
    }

    fn process(
        &self,
        frame: &mut DatasetFrame,
        context: &ProcessContext<'_>,
    ) -> Result<ProcessReport> {
        let options = context.options;
        let mut report = ProcessReport {
            rows_in: frame.record_count(),
            ..ProcessReport::default()
        };

        run_stage(frame, "normalize", |df| normalize(&df, context.schema))?;

        match context.annotation {
            Some(annotation) => {
                let deriver = EqtlDeriver;
                run_stage(frame, deriver.name(), |df| {
                    let derived = deriver.derive(df, annotation)?;
                    report.derive = Some(derived.stats);
                    Ok(derived.data)
                })?;
            }
            None => run_stage(frame, "parse_variants", parse_variants)?,
        }

        if options.protein_coding_only {
            run_stage(frame, "filter_protein_coding", |df| filter_protein_coding(&df))?;
        }
        if let Some(window) = options.window {
            run_stage(frame, "filter_by_distance", |df| filter_by_distance(&df, window))?;
        }
        if options.snp_only {
            run_stage(frame, "filter_snp_only", |df| filter_snp_only(&df))?;
        }
        // Covers every filtered row, ambiguous scores included.
        if let Some(genome) = context.genome {
            let matches = verify_reference_alleles(&frame.data, genome)
                .map_err(|source| stage_error(frame, "verify_reference_alleles", source))?;
            report.reference = Some(matches);
        }
        run_stage(frame, "assign_labels", |df| {
            assign_labels(&df, options.thresholds)
        })?;

        run_stage(frame, "select_columns", |df| {
            select_present(&df, context.export_columns)
        })?;

        report.rows_out = frame.record_count();
        info!(
            dataset = %frame.dataset,
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            "processed eQTL dataset"
        );
        Ok(report)
    }
}
