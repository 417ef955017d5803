//! Per-task processing.
//!
//! | Task     | Stages                                                                      |
//! |----------|-----------------------------------------------------------------------------|
//! | enhancer | normalize, strand, distance window                                          |
//! | eqtl     | normalize, variant split, annotation join, filters, reference check, labels |

mod enhancer;
mod eqtl;
mod processor_trait;

pub use enhancer::EnhancerProcessor;
pub use eqtl::EqtlProcessor;
pub use processor_trait::{DatasetProcessor, ProcessReport, ProcessorRegistry, default_registry};

use gbench_transform::{DatasetFrame, TransformError};
use polars::prelude::DataFrame;

use crate::error::{ProcessError, Result};

/// Run one table stage on the frame, tagging failures with the dataset.
pub(crate) fn run_stage(
    frame: &mut DatasetFrame,
    stage: &'static str,
    run: impl FnOnce(DataFrame) -> std::result::Result<DataFrame, TransformError>,
) -> Result<()> {
    frame
        .try_apply(stage, run)
        .map_err(|source| stage_error(frame, stage, source))
}

pub(crate) fn stage_error(
    frame: &DatasetFrame,
    stage: &'static str,
    source: TransformError,
) -> ProcessError {
    ProcessError::Stage {
        task: frame.task,
        dataset: frame.dataset.clone(),
        stage,
        source,
    }
}
