//! Dataset frame: a table plus the task, dataset and provenance it came from.

use std::path::PathBuf;

use gbench_model::TaskKind;
use polars::prelude::DataFrame;

/// Provenance carried alongside a frame.
#[derive(Debug, Clone, Default)]
pub struct DatasetFrameMeta {
    /// Files the table was read from.
    pub source_files: Vec<PathBuf>,
    /// Stages applied so far, in order, with the row count after each.
    pub stages: Vec<StageRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    pub stage: String,
    pub rows: usize,
}

/// A benchmark table for one (task, dataset) pair.
///
/// Stages consume the frame's data and hand back a new table; the frame
/// records each step so the final output can say how it was produced.
#[derive(Debug, Clone)]
pub struct DatasetFrame {
    pub task: TaskKind,
    /// Registry key of the dataset, e.g. `Fulco`.
    pub dataset: String,
    pub data: DataFrame,
    pub meta: Option<DatasetFrameMeta>,
}

impl DatasetFrame {
    pub fn new(task: TaskKind, dataset: impl Into<String>, data: DataFrame) -> Self {
        Self {
            task,
            dataset: dataset.into(),
            data,
            meta: None,
        }
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn source_files(&self) -> &[PathBuf] {
        self.meta
            .as_ref()
            .map(|m| m.source_files.as_slice())
            .unwrap_or(&[])
    }

    pub fn stages(&self) -> &[StageRecord] {
        self.meta
            .as_ref()
            .map(|m| m.stages.as_slice())
            .unwrap_or(&[])
    }

    pub fn add_source_file(&mut self, path: PathBuf) {
        let meta = self.meta.get_or_insert_with(DatasetFrameMeta::default);
        meta.source_files.push(path);
    }

    /// Replace the table with a stage's output and record the stage.
    pub fn apply(&mut self, stage: &str, data: DataFrame) {
        let rows = data.height();
        self.data = data;
        let meta = self.meta.get_or_insert_with(DatasetFrameMeta::default);
        meta.stages.push(StageRecord {
            stage: stage.to_string(),
            rows,
        });
    }

    /// Run a fallible stage over the table, recording it on success.
    ///
    /// On failure the frame keeps an empty table; the caller is expected to
    /// abandon it.
    pub fn try_apply<E>(
        &mut self,
        stage: &str,
        run: impl FnOnce(DataFrame) -> Result<DataFrame, E>,
    ) -> Result<(), E> {
        let data = std::mem::replace(&mut self.data, DataFrame::empty());
        let output = run(data)?;
        self.apply(stage, output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame};

    fn frame() -> DatasetFrame {
        let data = DataFrame::new(vec![Column::new("score".into(), vec![0.1, 0.95, 0.5])])
            .unwrap();
        DatasetFrame::new(TaskKind::Eqtl, "Adipose_Subcutaneous", data)
    }

    #[test]
    fn new_frame_has_no_provenance() {
        let frame = frame();
        assert_eq!(frame.record_count(), 3);
        assert!(frame.source_files().is_empty());
        assert!(frame.stages().is_empty());
    }

    #[test]
    fn apply_records_stage_and_rows() {
        let mut frame = frame();
        frame.add_source_file(PathBuf::from("/cache/eqtl/Adipose_Subcutaneous.tsv"));
        let head = frame.data.head(Some(1));
        frame.apply("label", head);
        assert_eq!(frame.record_count(), 1);
        assert_eq!(
            frame.stages(),
            [StageRecord {
                stage: "label".to_string(),
                rows: 1
            }]
        );
        assert_eq!(frame.source_files().len(), 1);
    }

    #[test]
    fn try_apply_propagates_errors() {
        let mut frame = frame();
        let result: Result<(), String> = frame.try_apply("fail", |_| Err("boom".to_string()));
        assert_eq!(result, Err("boom".to_string()));
        assert!(frame.stages().is_empty());
    }
}
