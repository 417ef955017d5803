use std::path::PathBuf;

use gbench_core::ProcessReport;
use gbench_model::TaskKind;
use gbench_output::VcfExport;
use gbench_report::LabelDistribution;
use gbench_transform::StageRecord;

/// Everything `gbench process` produced for one dataset.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub task: TaskKind,
    pub dataset: String,
    pub output: PathBuf,
    pub stages: Vec<StageRecord>,
    pub report: ProcessReport,
    pub vcf: Option<VcfExport>,
    /// Present when the processed table carries labels.
    pub distribution: Option<LabelDistribution>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub output: PathBuf,
    pub rows_in: usize,
    pub rows_out: usize,
}
