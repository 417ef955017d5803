//! Entry points tying the registry, cache and processors together.

use std::path::Path;

use gbench_ingest::read_table;
use gbench_model::TaskKind;
use gbench_transform::DatasetFrame;
use tracing::info;

use crate::context::ProcessContext;
use crate::error::{ProcessError, Result};
use crate::processors::{ProcessReport, ProcessorRegistry, default_registry};

/// Read a cached table into a frame that remembers its source file.
pub fn load_frame(task: TaskKind, dataset: &str, path: &Path) -> Result<DatasetFrame> {
    let data = read_table(path)?;
    info!(
        task = %task,
        dataset,
        rows = data.height(),
        columns = data.width(),
        "loaded dataset table"
    );
    let mut frame = DatasetFrame::new(task, dataset, data);
    frame.add_source_file(path.to_path_buf());
    Ok(frame)
}

/// Process a frame with the default processor for its task.
pub fn process_frame(
    frame: &mut DatasetFrame,
    context: &ProcessContext<'_>,
) -> Result<ProcessReport> {
    process_frame_with_registry(default_registry(), frame, context)
}

pub fn process_frame_with_registry(
    registry: &ProcessorRegistry,
    frame: &mut DatasetFrame,
    context: &ProcessContext<'_>,
) -> Result<ProcessReport> {
    let processor = registry
        .get(frame.task)
        .ok_or(ProcessError::NoProcessor(frame.task))?;
    processor.process(frame, context)
}
