//! CLI argument definitions for the benchmark builder.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "gbench",
    version,
    about = "Build and score genomic association benchmarks",
    long_about = "Download enhancer-gene and eQTL benchmark datasets, normalize and \
                  annotate them, and evaluate predictor scores against their labels.\n\n\
                  Dataset tables are cached under GENOMIC_BENCHMARK_CACHE_ROOT \
                  (default: ~/.cache/genomics_benchmark)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Dataset registry TOML to use instead of the built-in one.
    #[arg(long = "registry", value_name = "PATH", global = true)]
    pub registry: Option<PathBuf>,

    /// Cache directory for downloads and processed tables.
    #[arg(long = "cache-root", value_name = "DIR", global = true)]
    pub cache_root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List benchmark tasks and their dataset counts.
    Tasks,

    /// List the datasets registered for a task.
    Datasets {
        /// Task name (enhancer or eqtl).
        task: String,
    },

    /// Download a dataset's table and description into the cache.
    Download(DownloadArgs),

    /// Download, process and save a dataset.
    Process(ProcessArgs),

    /// Score a predictor column against the labels of a table.
    Evaluate(EvaluateArgs),

    /// Show the label distribution of a table.
    Distribution(DistributionArgs),

    /// Keep rows of a table whose distance lies in a window.
    FilterDistance(FilterDistanceArgs),

    /// Download a reference genome FASTA and GTF.
    Genome(GenomeArgs),

    /// Remove cached files for one dataset or everything.
    ClearCache(ClearCacheArgs),
}

#[derive(Args)]
pub struct DatasetArgs {
    /// Task name (enhancer or eqtl).
    pub task: String,

    /// Dataset key; matched case-insensitively.
    pub dataset: String,
}

#[derive(Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Also fetch the unprocessed source table.
    #[arg(long = "raw")]
    pub raw: bool,

    /// Download again even when cached.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Args)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// GTF annotation for strand, TSS and biotype lookup.
    #[arg(long = "gtf", value_name = "PATH")]
    pub gtf: Option<PathBuf>,

    /// Reference FASTA for checking eQTL reference alleles.
    #[arg(long = "fasta", value_name = "PATH")]
    pub fasta: Option<PathBuf>,

    /// Download the dataset's reference genome and use it for any of
    /// --gtf/--fasta not given.
    #[arg(long = "reference")]
    pub reference: bool,

    /// Smallest distance to keep (requires --max-distance or defaults to 0).
    #[arg(long = "min-distance", value_name = "BP")]
    pub min_distance: Option<i64>,

    /// Largest distance to keep.
    #[arg(long = "max-distance", value_name = "BP")]
    pub max_distance: Option<i64>,

    /// eQTL: scores at or above this are positives.
    #[arg(long = "positive-threshold", default_value_t = 0.9)]
    pub positive_threshold: f64,

    /// eQTL: scores at or below this are negatives.
    #[arg(long = "negative-threshold", default_value_t = 0.01)]
    pub negative_threshold: f64,

    /// eQTL: keep single-nucleotide variants only.
    #[arg(long = "snp-only")]
    pub snp_only: bool,

    /// eQTL: keep variants of protein-coding genes only.
    #[arg(long = "protein-coding-only")]
    pub protein_coding_only: bool,

    /// File name (without extension) for the processed table.
    #[arg(long = "output-name", value_name = "NAME")]
    pub output_name: Option<String>,

    /// Write the processed table here instead of the cache.
    #[arg(long = "output", value_name = "PATH", conflicts_with = "output_name")]
    pub output: Option<PathBuf>,

    /// Also write positive/negative VCF files into this directory.
    #[arg(long = "vcf-dir", value_name = "DIR")]
    pub vcf_dir: Option<PathBuf>,

    /// Download again even when cached.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Table with a `label` column and a score column.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Column holding predictor scores.
    #[arg(long = "score-column", default_value = "score")]
    pub score_column: String,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct DistributionArgs {
    /// Table with a `label` column.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct FilterDistanceArgs {
    /// Table with a `distance` column.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the filtered table; format follows the extension.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[arg(long = "min-distance", value_name = "BP", default_value_t = 0)]
    pub min_distance: i64,

    #[arg(long = "max-distance", value_name = "BP")]
    pub max_distance: i64,
}

#[derive(Args)]
pub struct GenomeArgs {
    /// Genome build (hg19, hg38, mm10).
    pub build: String,

    /// Download again even when cached.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Args)]
pub struct ClearCacheArgs {
    /// Task of the dataset to clear.
    #[arg(required_unless_present = "all")]
    pub task: Option<String>,

    /// Dataset key to clear.
    #[arg(required_unless_present = "all")]
    pub dataset: Option<String>,

    /// Remove the whole cache directory.
    #[arg(long = "all", conflicts_with_all = ["task", "dataset"])]
    pub all: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
