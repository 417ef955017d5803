use gbench_ingest::SequenceSource;
use gbench_model::{DistanceWindow, GeneAnnotation, LabelThresholds, SchemaConfig};

/// Run options shared by all processors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Keep rows whose `distance` is inside this window.
    pub window: Option<DistanceWindow>,
    /// eQTL label thresholds on `score`.
    pub thresholds: LabelThresholds,
    /// eQTL: keep single-nucleotide variants only.
    pub snp_only: bool,
    /// eQTL: keep variants of protein-coding genes only.
    pub protein_coding_only: bool,
}

/// Everything a processor needs besides the table itself.
#[derive(Clone, Copy)]
pub struct ProcessContext<'a> {
    pub schema: &'a SchemaConfig,
    /// Columns written out, in order; absent ones are skipped.
    pub export_columns: &'a [String],
    pub annotation: Option<&'a GeneAnnotation>,
    pub genome: Option<&'a dyn SequenceSource>,
    pub options: ProcessOptions,
}

impl<'a> ProcessContext<'a> {
    pub fn new(schema: &'a SchemaConfig, export_columns: &'a [String]) -> Self {
        Self {
            schema,
            export_columns,
            annotation: None,
            genome: None,
            options: ProcessOptions::default(),
        }
    }

    pub fn with_annotation(mut self, annotation: &'a GeneAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn with_genome(mut self, genome: &'a dyn SequenceSource) -> Self {
        self.genome = Some(genome);
        self
    }

    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.options = options;
        self
    }
}
