use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use comfy_table::Table;
use gbench_core::{
    CacheScope, DatasetDownload, GenomeDownload, ProcessContext, ProcessOptions, clear_cache,
    download_dataset, download_genome, load_frame, process_frame, resolve_cache_root,
};
use gbench_ingest::{
    CachedFetcher, FetchConfig, IndexedFasta, SequenceSource, load_gene_annotation, read_table,
    write_table,
};
use gbench_model::columns::LABEL;
use gbench_model::{DistanceWindow, LabelThresholds, TaskKind};
use gbench_output::{processed_output_path, write_minimal_vcf, write_tsv};
use gbench_registry::{DatasetConfig, Registry};
use gbench_report::{LabelDistribution, MetricReport, evaluate, label_distribution};
use gbench_transform::filter_by_distance;
use tracing::{info, info_span};

use crate::cli::{
    ClearCacheArgs, DistributionArgs, DownloadArgs, EvaluateArgs, FilterDistanceArgs, GenomeArgs,
    ProcessArgs,
};
use crate::summary::apply_table_style;
use crate::types::{FilterOutcome, ProcessOutcome};

/// Registry and cache root shared by every command.
pub struct Workspace {
    pub registry: Registry,
    pub cache_root: PathBuf,
}

impl Workspace {
    pub fn load(registry: Option<&Path>, cache_root: Option<&Path>) -> Result<Self> {
        let registry = match registry {
            Some(path) => Registry::from_path(path),
            None => Registry::load_default(),
        }
        .context("load dataset registry")?;
        let cache_root = resolve_cache_root(cache_root)?;
        Ok(Self {
            registry,
            cache_root,
        })
    }

    fn dataset(&self, task: &str, dataset: &str) -> Result<&DatasetConfig> {
        Ok(self.registry.dataset(task, dataset)?)
    }
}

fn fetcher() -> Result<CachedFetcher> {
    let config = FetchConfig {
        show_progress: io::stderr().is_terminal(),
        ..FetchConfig::default()
    };
    Ok(CachedFetcher::new(config)?)
}

pub fn tasks_table(registry: &Registry) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Task", "Datasets", "Columns"]);
    apply_table_style(&mut table);
    for task in registry.tasks() {
        table.add_row(vec![
            task.kind.to_string(),
            task.dataset_names().count().to_string(),
            task.columns.join(", "),
        ]);
    }
    table
}

pub fn datasets_table(registry: &Registry, task: &str) -> Result<Table> {
    let config = registry.task(task)?;
    let mut table = Table::new();
    table.set_header(vec!["Dataset", "Name", "Genome", "Raw", "Description"]);
    apply_table_style(&mut table);
    for dataset in config.datasets() {
        table.add_row(vec![
            dataset.key.clone(),
            dataset.name.clone(),
            dataset.genome_version.clone(),
            if dataset.raw.is_some() { "yes" } else { "-" }.to_string(),
            dataset.description.clone(),
        ]);
    }
    Ok(table)
}

pub fn run_download(workspace: &Workspace, args: &DownloadArgs) -> Result<DatasetDownload> {
    let config = workspace.dataset(&args.dataset.task, &args.dataset.dataset)?;
    let download = download_dataset(
        &fetcher()?,
        config,
        &workspace.cache_root,
        args.raw,
        args.force,
    )
    .with_context(|| format!("download {}/{}", config.task, config.key))?;
    Ok(download)
}

pub fn run_genome(workspace: &Workspace, args: &GenomeArgs) -> Result<GenomeDownload> {
    let genome = workspace.registry.genome(&args.build)?;
    let download = download_genome(&fetcher()?, genome, &workspace.cache_root, args.force)
        .with_context(|| format!("download genome {}", genome.build))?;
    Ok(download)
}

pub fn run_process(workspace: &Workspace, args: &ProcessArgs) -> Result<ProcessOutcome> {
    let config = workspace.dataset(&args.dataset.task, &args.dataset.dataset)?;
    let task = workspace.registry.task(config.task.as_str())?;
    let span = info_span!("process", task = %config.task, dataset = %config.key);
    let _guard = span.enter();

    let options = process_options(args)?;
    let fetcher = fetcher()?;
    let download = download_dataset(&fetcher, config, &workspace.cache_root, false, args.force)
        .with_context(|| format!("download {}/{}", config.task, config.key))?;

    let reference = if args.reference && (args.gtf.is_none() || args.fasta.is_none()) {
        let genome = workspace.registry.genome(&config.genome_version)?;
        let download = download_genome(&fetcher, genome, &workspace.cache_root, args.force)
            .with_context(|| format!("download genome {}", genome.build))?;
        Some(download)
    } else {
        None
    };
    let gtf = args
        .gtf
        .clone()
        .or_else(|| reference.as_ref().map(|r| r.gtf.clone()));
    let fasta = args
        .fasta
        .clone()
        .or_else(|| reference.as_ref().map(|r| r.fasta.clone()));

    let annotation = gtf
        .as_deref()
        .map(|path| {
            load_gene_annotation(path).with_context(|| format!("load GTF {}", path.display()))
        })
        .transpose()?;
    let genome = fasta
        .as_deref()
        .map(|path| {
            IndexedFasta::open(path).with_context(|| format!("open FASTA {}", path.display()))
        })
        .transpose()?;

    let mut context =
        ProcessContext::new(&config.schema, &task.export_columns).with_options(options);
    if let Some(annotation) = &annotation {
        context = context.with_annotation(annotation);
    }
    if let Some(genome) = &genome {
        context = context.with_genome(genome as &dyn SequenceSource);
    }

    let mut frame = load_frame(config.task, &config.key, &download.data)?;
    let report = process_frame(&mut frame, &context)?;

    let output = args.output.clone().unwrap_or_else(|| {
        processed_output_path(
            &workspace.cache_root,
            config.task,
            &config.key,
            args.output_name.as_deref(),
        )
    });
    write_tsv(&frame.data, &output)?;
    info!(path = %output.display(), rows = frame.record_count(), "saved processed table");

    let vcf = args
        .vcf_dir
        .as_deref()
        .map(|dir| write_minimal_vcf(&frame.data, dir))
        .transpose()?;
    let distribution = if frame.data.column(LABEL).is_ok() {
        Some(label_distribution(&frame.data)?)
    } else {
        None
    };

    Ok(ProcessOutcome {
        task: config.task,
        dataset: config.key.clone(),
        output,
        stages: frame.stages().to_vec(),
        report,
        vcf,
        distribution,
    })
}

/// Distance window and thresholds from the command line.
pub fn process_options(args: &ProcessArgs) -> Result<ProcessOptions> {
    let window = match (args.min_distance, args.max_distance) {
        (None, None) => None,
        (min, Some(max)) => Some(DistanceWindow::new(min.unwrap_or(0), max)?),
        (Some(min), None) => Some(DistanceWindow::new(min, i64::MAX)?),
    };
    let thresholds = LabelThresholds::new(args.positive_threshold, args.negative_threshold)?;
    Ok(ProcessOptions {
        window,
        thresholds,
        snp_only: args.snp_only,
        protein_coding_only: args.protein_coding_only,
    })
}

pub fn run_evaluate(args: &EvaluateArgs) -> Result<MetricReport> {
    let df = read_table(&args.table)?;
    let report = evaluate(&df, &args.score_column)
        .with_context(|| format!("evaluate {}", args.table.display()))?;
    Ok(report)
}

pub fn run_distribution(args: &DistributionArgs) -> Result<LabelDistribution> {
    let df = read_table(&args.table)?;
    let distribution = label_distribution(&df)
        .with_context(|| format!("label distribution of {}", args.table.display()))?;
    Ok(distribution)
}

pub fn run_filter_distance(args: &FilterDistanceArgs) -> Result<FilterOutcome> {
    let window = DistanceWindow::new(args.min_distance, args.max_distance)?;
    let df = read_table(&args.input)?;
    let mut filtered = filter_by_distance(&df, window)
        .with_context(|| format!("filter {}", args.input.display()))?;
    write_table(&mut filtered, &args.output)?;
    Ok(FilterOutcome {
        output: args.output.clone(),
        rows_in: df.height(),
        rows_out: filtered.height(),
    })
}

pub fn run_clear_cache(workspace: &Workspace, args: &ClearCacheArgs) -> Result<Option<PathBuf>> {
    let scope = match (&args.task, &args.dataset, args.all) {
        (_, _, true) => CacheScope::All,
        (Some(task), Some(dataset), false) => {
            let task: TaskKind = task.parse().map_err(|message: String| anyhow!(message))?;
            CacheScope::Dataset { task, dataset }
        }
        _ => return Err(anyhow!("give a task and dataset, or --all")),
    };
    Ok(clear_cache(&workspace.cache_root, scope)?)
}
