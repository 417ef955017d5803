//! End-to-end command runs against a registry of local files.

use std::path::{Path, PathBuf};

use clap::Parser;
use gbench_cli::cli::{
    ClearCacheArgs, Cli, Command, DatasetArgs, EvaluateArgs, FilterDistanceArgs, ProcessArgs,
};
use gbench_cli::commands::{
    Workspace, datasets_table, process_options, run_clear_cache, run_evaluate,
    run_filter_distance, run_process, tasks_table,
};
use gbench_cli::summary::distribution_table;
use tempfile::TempDir;

const EQTL_TABLE: &str = "\
variant_id\tgene_name\tpip
chr1_3_G_A_b38\tGENE1\t0.95
chr1_5_C_T_b38\tGENE1\t0.005
chr1_4_T_C_b38\tGENE1\t0.5
chr1_7_G_C_b38\tGENE1\t0.001
";

const GTF: &str = "chr1\ttest\tgene\t1\t8\t.\t+\t.\tgene_id \"G1\"; gene_type \"protein_coding\"; gene_name \"GENE1\";\n";

struct Setup {
    dir: TempDir,
    workspace: Workspace,
}

fn setup() -> Setup {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source");
    std::fs::create_dir_all(&source).unwrap();
    std::fs::write(source.join("eqtl.tsv"), EQTL_TABLE).unwrap();
    std::fs::write(source.join("about.md"), "# About\n").unwrap();
    std::fs::write(source.join("genes.gtf"), GTF).unwrap();

    let url = |name: &str| format!("file://{}", source.join(name).display());
    let registry = format!(
        r#"
[registry]
schema = "gbench.dataset-registry"
schema_version = 1

[tasks.eqtl]
columns = ["variant_id", "gene_name", "score"]
export_columns = ["chr", "start", "end", "ref", "alt", "gene_name", "gene_tss", "strand", "distance", "score", "label"]

[tasks.eqtl.datasets.Toy]
name = "Toy eQTLs"
description = "Four fine-mapped variants"
genome_version = "hg38"
data = {{ url = "{data}", format = "tsv" }}
info = {{ url = "{info}", format = "md" }}
column_mapping = {{ score = "pip" }}
"#,
        data = url("eqtl.tsv"),
        info = url("about.md"),
    );
    let registry_path = dir.path().join("registry.toml");
    std::fs::write(&registry_path, registry).unwrap();

    let cache = dir.path().join("cache");
    let workspace = Workspace::load(Some(registry_path.as_path()), Some(cache.as_path())).unwrap();
    Setup { dir, workspace }
}

fn process_args(dir: &Path) -> ProcessArgs {
    ProcessArgs {
        dataset: DatasetArgs {
            task: "eqtl".to_string(),
            dataset: "toy".to_string(),
        },
        gtf: Some(dir.join("source").join("genes.gtf")),
        fasta: None,
        reference: false,
        min_distance: None,
        max_distance: None,
        positive_threshold: 0.9,
        negative_threshold: 0.01,
        snp_only: false,
        protein_coding_only: false,
        output_name: None,
        output: None,
        vcf_dir: Some(dir.join("vcf")),
        force: false,
    }
}

#[test]
fn process_writes_table_vcf_and_distribution() {
    let setup = setup();
    let outcome = run_process(&setup.workspace, &process_args(setup.dir.path())).unwrap();

    let expected: PathBuf = setup.dir.path().join("cache/eqtl/Toy/Toy.tsv");
    assert_eq!(outcome.output, expected);
    assert!(expected.exists());
    assert_eq!(outcome.report.rows_out, 3);

    let vcf = outcome.vcf.unwrap();
    assert_eq!((vcf.positive_count, vcf.negative_count), (1, 2));
    let positive = std::fs::read_to_string(&vcf.positive).unwrap();
    assert!(positive.ends_with("chr1\t3\t.\tG\tA\t.\tPASS\t2\t+\tGENE1\n"));

    let distribution = outcome.distribution.unwrap();
    assert_eq!(distribution.total, 3);
    assert!((distribution.positive_negative_ratio - 0.5).abs() < 1e-12);
    assert!(distribution_table(&distribution).to_string().contains("TOTAL"));

    let report = run_evaluate(&EvaluateArgs {
        table: expected,
        score_column: "score".to_string(),
        json: false,
    })
    .unwrap();
    assert!((report.auroc - 1.0).abs() < 1e-12);
    assert_eq!(report.n_samples, 3);
}

#[test]
fn custom_output_name_and_filter_distance() {
    let setup = setup();
    let args = ProcessArgs {
        output_name: Some("toy_labeled".to_string()),
        vcf_dir: None,
        ..process_args(setup.dir.path())
    };
    let outcome = run_process(&setup.workspace, &args).unwrap();
    assert!(outcome.output.ends_with("eqtl/Toy/toy_labeled.tsv"));
    assert_eq!(outcome.vcf, None);

    let filtered = setup.dir.path().join("near.csv");
    let result = run_filter_distance(&FilterDistanceArgs {
        input: outcome.output,
        output: filtered.clone(),
        min_distance: 0,
        max_distance: 4,
    })
    .unwrap();
    assert_eq!((result.rows_in, result.rows_out), (3, 2));
    assert!(filtered.exists());
}

#[test]
fn window_options_are_validated() {
    let setup = setup();
    let mut args = process_args(setup.dir.path());
    assert!(process_options(&args).unwrap().window.is_none());

    args.max_distance = Some(100);
    let window = process_options(&args).unwrap().window.unwrap();
    assert_eq!((window.lower(), window.upper()), (0, 100));

    args.min_distance = Some(200);
    assert!(process_options(&args).is_err());

    args.min_distance = None;
    args.positive_threshold = 0.001;
    assert!(process_options(&args).is_err());
}

#[test]
fn listing_and_unknown_dataset() {
    let setup = setup();
    let tasks = tasks_table(&setup.workspace.registry).to_string();
    assert!(tasks.contains("eqtl"));
    let datasets = datasets_table(&setup.workspace.registry, "eqtl")
        .unwrap()
        .to_string();
    assert!(datasets.contains("Toy eQTLs"));

    let mut args = process_args(setup.dir.path());
    args.dataset.dataset = "Missing".to_string();
    let err = run_process(&setup.workspace, &args).unwrap_err();
    assert!(err.to_string().contains("Missing"));
}

#[test]
fn clear_cache_removes_processed_dataset() {
    let setup = setup();
    run_process(&setup.workspace, &process_args(setup.dir.path())).unwrap();
    let args = ClearCacheArgs {
        task: Some("eqtl".to_string()),
        dataset: Some("Toy".to_string()),
        all: false,
    };
    let removed = run_clear_cache(&setup.workspace, &args).unwrap();
    assert_eq!(removed, Some(setup.dir.path().join("cache/eqtl/Toy")));
    assert_eq!(run_clear_cache(&setup.workspace, &args).unwrap(), None);
}

#[test]
fn clear_cache_needs_a_target() {
    assert!(Cli::try_parse_from(["gbench", "clear-cache"]).is_err());
    assert!(Cli::try_parse_from(["gbench", "clear-cache", "eqtl", "Toy", "--all"]).is_err());
    let cli = Cli::try_parse_from(["gbench", "clear-cache", "--all"]).unwrap();
    assert!(matches!(cli.command, Command::ClearCache(ClearCacheArgs { all: true, .. })));
}

#[test]
fn global_flags_parse_after_subcommand() {
    let cli = Cli::try_parse_from([
        "gbench",
        "process",
        "eqtl",
        "Toy",
        "--max-distance",
        "1000",
        "--snp-only",
        "--cache-root",
        "/tmp/cache",
        "--log-format",
        "json",
    ])
    .unwrap();
    let Command::Process(args) = cli.command else {
        panic!("expected process command");
    };
    assert_eq!(args.max_distance, Some(1000));
    assert!(args.snp_only);
    assert_eq!(cli.cache_root.as_deref(), Some(Path::new("/tmp/cache")));
}
