//! Download and process datasets from a registry of local `file://` URLs.

use std::path::{Path, PathBuf};

use gbench_core::{
    CacheScope, ProcessContext, ProcessError, ProcessOptions, clear_cache, dataset_cache_dir,
    download_dataset, load_frame, process_frame,
};
use gbench_ingest::{CachedFetcher, FetchConfig, IndexedFasta, load_gene_annotation};
use gbench_model::{DistanceWindow, TaskKind};
use gbench_registry::Registry;
use tempfile::TempDir;

const EQTL_TABLE: &str = "\
variant_id\tgene_name\tpip\ttissue
chr1_3_G_A_b38\tGENE1\t0.95\tAdipose
chr1_5_C_T_b38\tGENE1\t0.005\tAdipose
chr1_4_T_C_b38\tGENE2\t0.5\tAdipose
chr1_2_CA_C_b38\tGENE1\t0.99\tAdipose
chr1_9_A_G_b38\tNOPE\t0.99\tAdipose
";

const ENHANCER_TABLE: &str = "\
chr\tstart\tend\tgene_name\tgene_tss\tdistance\tscore\tlabel\tcell_type
chr1\t100\t300\tGENE1\t250\t50\t0.4\t1\tK562
chr1\t900\t1100\tGENE2\t5000\t3900\t0.02\t0\tK562
chr1\t400\t600\tGENE2\t560\t60\tNA\t0\tK562
";

const GTF: &str = "\
chr1\ttest\tgene\t1\t8\t.\t+\t.\tgene_id \"G1\"; gene_type \"protein_coding\"; gene_name \"GENE1\";
chr1\ttest\tgene\t2\t10\t.\t-\t.\tgene_id \"G2\"; gene_type \"lncRNA\"; gene_name \"GENE2\";
";

struct Fixture {
    dir: TempDir,
    registry: Registry,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("adipose.tsv"), EQTL_TABLE).unwrap();
        std::fs::write(source.join("fulco.tsv"), ENHANCER_TABLE).unwrap();
        std::fs::write(source.join("about.md"), "# About\n").unwrap();
        std::fs::write(source.join("genes.gtf"), GTF).unwrap();
        std::fs::write(source.join("genome.fa"), ">chr1\nACGTACGTAC\n").unwrap();

        let url = |name: &str| format!("file://{}", source.join(name).display());
        let toml = format!(
            r#"
[registry]
schema = "gbench.dataset-registry"
schema_version = 1

[tasks.enhancer]
columns = ["chr", "start", "end", "gene_name", "gene_tss", "distance", "score", "label"]
export_columns = ["chr", "start", "end", "gene_name", "gene_tss", "strand", "distance", "score", "label"]

[tasks.enhancer.datasets.Fulco]
name = "Fulco"
genome_version = "hg38"
data = {{ url = "{fulco}", format = "tsv" }}
info = {{ url = "{about}", format = "md" }}
raw = {{ url = "{fulco}", format = "tsv" }}

[tasks.eqtl]
columns = ["variant_id", "gene_name", "score"]
export_columns = ["chr", "start", "end", "ref", "alt", "gene_name", "gene_tss", "strand", "distance", "score", "label"]

[tasks.eqtl.datasets.Adipose_Subcutaneous]
name = "Adipose"
genome_version = "hg38"
data = {{ url = "{adipose}", format = "tsv" }}
info = {{ url = "{about}", format = "md" }}
column_mapping = {{ score = "pip" }}
"#,
            fulco = url("fulco.tsv"),
            adipose = url("adipose.tsv"),
            about = url("about.md"),
        );
        let registry = Registry::from_toml_str(&toml, "fixture").unwrap();
        Self { dir, registry }
    }

    fn cache_root(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    fn source(&self, name: &str) -> PathBuf {
        self.dir.path().join("source").join(name)
    }
}

fn fetcher() -> CachedFetcher {
    CachedFetcher::new(FetchConfig {
        show_progress: false,
        ..FetchConfig::default()
    })
    .unwrap()
}

fn column_names(frame: &polars::prelude::DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn download_names_files_after_the_dataset() {
    let fixture = Fixture::new();
    let config = fixture.registry.dataset("enhancer", "Fulco").unwrap();
    let root = fixture.cache_root();

    let download = download_dataset(&fetcher(), config, &root, true, false).unwrap();
    let dir = dataset_cache_dir(&root, TaskKind::Enhancer, "Fulco");
    assert_eq!(download.data, dir.join("Fulco.tsv"));
    assert_eq!(download.info, dir.join("Fulco_info.md"));
    assert_eq!(download.raw, Some(dir.join("Fulco_raw.tsv")));
    assert!(download.raw.as_deref().is_some_and(Path::exists));

    let scope = CacheScope::Dataset {
        task: TaskKind::Enhancer,
        dataset: "Fulco",
    };
    assert_eq!(clear_cache(&root, scope).unwrap(), Some(dir.clone()));
    assert!(!dir.exists());
}

#[test]
fn eqtl_dataset_is_joined_labeled_and_checked() {
    let fixture = Fixture::new();
    let config = fixture.registry.dataset("eqtl", "adipose_subcutaneous").unwrap();
    let task = fixture.registry.task("eqtl").unwrap();
    let download = download_dataset(&fetcher(), config, &fixture.cache_root(), false, false).unwrap();
    assert_eq!(download.raw, None);

    let annotation = load_gene_annotation(&fixture.source("genes.gtf")).unwrap();
    let genome = IndexedFasta::open(&fixture.source("genome.fa")).unwrap();
    let context = ProcessContext::new(&config.schema, &task.export_columns)
        .with_annotation(&annotation)
        .with_genome(&genome);

    let mut frame = load_frame(config.task, &config.key, &download.data).unwrap();
    let report = process_frame(&mut frame, &context).unwrap();

    assert_eq!(report.rows_in, 5);
    assert_eq!(report.rows_out, 3);
    assert_eq!(report.derive.unwrap().unmatched_dropped, 1);
    // The check runs before labeling: the ambiguous chr1:4 T>C row is counted
    // and the CA indel does not match the single base C.
    let reference = report.reference.unwrap();
    assert_eq!(
        (reference.total, reference.matching, reference.mismatching),
        (4, 2, 2)
    );

    let stages: Vec<(&str, usize)> = frame
        .stages()
        .iter()
        .map(|s| (s.stage.as_str(), s.rows))
        .collect();
    assert_eq!(
        stages,
        [
            ("normalize", 5),
            ("derive_eqtl", 4),
            ("assign_labels", 3),
            ("select_columns", 3),
        ]
    );
    assert_eq!(column_names(&frame.data), task.export_columns);

    let distance = frame.data.column("distance").unwrap().i64().unwrap();
    let distances: Vec<Option<i64>> = distance.into_iter().collect();
    assert_eq!(distances, [Some(2), Some(4), Some(1)]);
}

#[test]
fn eqtl_filters_follow_options() {
    let fixture = Fixture::new();
    let config = fixture.registry.dataset("eqtl", "Adipose_Subcutaneous").unwrap();
    let task = fixture.registry.task("eqtl").unwrap();
    let annotation = load_gene_annotation(&fixture.source("genes.gtf")).unwrap();
    let options = ProcessOptions {
        window: Some(DistanceWindow::up_to(3).unwrap()),
        snp_only: true,
        protein_coding_only: true,
        ..ProcessOptions::default()
    };
    let context = ProcessContext::new(&config.schema, &task.export_columns)
        .with_annotation(&annotation)
        .with_options(options);

    let mut frame = load_frame(config.task, &config.key, &fixture.source("adipose.tsv")).unwrap();
    let report = process_frame(&mut frame, &context).unwrap();
    assert_eq!(report.reference, None);
    // Only chr1:3 G>A survives: chr1:5 is too far, chr1:2 is an indel, GENE2 is lncRNA.
    assert_eq!(report.rows_out, 1);
    let start = frame.data.column("start").unwrap().i64().unwrap().get(0);
    assert_eq!(start, Some(3));
}

#[test]
fn enhancer_window_without_annotation_skips_strand() {
    let fixture = Fixture::new();
    let config = fixture.registry.dataset("enhancer", "Fulco").unwrap();
    let task = fixture.registry.task("enhancer").unwrap();
    let options = ProcessOptions {
        window: Some(DistanceWindow::up_to(100).unwrap()),
        ..ProcessOptions::default()
    };
    let context = ProcessContext::new(&config.schema, &task.export_columns).with_options(options);

    let mut frame = load_frame(config.task, &config.key, &fixture.source("fulco.tsv")).unwrap();
    let report = process_frame(&mut frame, &context).unwrap();
    assert_eq!(report.rows_out, 2);
    assert_eq!(report.derive, None);
    assert_eq!(
        column_names(&frame.data),
        ["chr", "start", "end", "gene_name", "gene_tss", "distance", "score", "label"]
    );
    assert_eq!(frame.data.column("score").unwrap().null_count(), 1);
}

#[test]
fn stage_failures_name_the_dataset() {
    let fixture = Fixture::new();
    let config = fixture.registry.dataset("eqtl", "Adipose_Subcutaneous").unwrap();
    let task = fixture.registry.task("eqtl").unwrap();
    let context = ProcessContext::new(&config.schema, &task.export_columns);

    let mut frame = load_frame(TaskKind::Eqtl, &config.key, &fixture.source("fulco.tsv")).unwrap();
    let err = process_frame(&mut frame, &context).unwrap_err();
    assert!(matches!(err, ProcessError::Stage { stage: "normalize", .. }));
    assert_eq!(err.to_string(), "eqtl/Adipose_Subcutaneous: normalize failed");
    let source = std::error::Error::source(&err).unwrap().to_string();
    assert_eq!(
        source,
        "schema mismatch: missing columns variant_id, score (from 'pip')"
    );
}
