//! Dataset processor trait and registry.
//!
//! Each task family has one [`DatasetProcessor`] that composes the table
//! stages for that family. Processors are looked up by [`TaskKind`] in a
//! [`ProcessorRegistry`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use gbench_model::TaskKind;
use gbench_transform::{DatasetFrame, DeriveStats, ReferenceMatchReport};

use super::enhancer::EnhancerProcessor;
use super::eqtl::EqtlProcessor;
use crate::context::ProcessContext;
use crate::error::Result;

/// What a processor did, beyond the per-stage row counts on the frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub derive: Option<DeriveStats>,
    pub reference: Option<ReferenceMatchReport>,
}

/// Task-specific processing of a raw dataset table.
///
/// Implementors normalize the frame, add derived columns, apply filters and
/// leave the frame projected onto the export columns. Stage failures are
/// returned as [`ProcessError::Stage`](crate::ProcessError::Stage).
pub trait DatasetProcessor: Send + Sync {
    fn task(&self) -> TaskKind;

    fn description(&self) -> &'static str {
        "Dataset processor"
    }

    fn process(
        &self,
        frame: &mut DatasetFrame,
        context: &ProcessContext<'_>,
    ) -> Result<ProcessReport>;
}

/// Processors indexed by task.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: BTreeMap<TaskKind, Box<dyn DatasetProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a processor for its task, replacing any previous one.
    pub fn register(&mut self, processor: Box<dyn DatasetProcessor>) {
        self.processors.insert(processor.task(), processor);
    }

    pub fn get(&self, task: TaskKind) -> Option<&dyn DatasetProcessor> {
        self.processors.get(&task).map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn tasks(&self) -> impl Iterator<Item = TaskKind> + '_ {
        self.processors.keys().copied()
    }
}

static DEFAULT_REGISTRY: OnceLock<ProcessorRegistry> = OnceLock::new();

/// Registry with the enhancer and eQTL processors.
pub fn default_registry() -> &'static ProcessorRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    registry.register(Box::new(EnhancerProcessor));
    registry.register(Box::new(EqtlProcessor));
    registry
}
