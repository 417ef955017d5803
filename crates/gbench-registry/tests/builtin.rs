use gbench_model::{FileFormat, TaskKind};
use gbench_registry::{Registry, RegistryError};

#[test]
fn builtin_registry_lists_both_tasks() {
    let registry = Registry::builtin().expect("load builtin registry");
    let kinds: Vec<TaskKind> = registry.tasks().map(|task| task.kind).collect();
    assert_eq!(kinds, vec![TaskKind::Enhancer, TaskKind::Eqtl]);
}

#[test]
fn builtin_enhancer_datasets() {
    let registry = Registry::builtin().expect("load builtin registry");
    let datasets = registry.datasets("enhancer").expect("enhancer datasets");
    assert_eq!(datasets, vec!["Fulco", "Gasperini", "Merged", "Schraivogel"]);

    let gasperini = registry
        .dataset("enhancer", "Gasperini")
        .expect("gasperini config");
    assert_eq!(gasperini.genome_version, "hg38");
    assert_eq!(gasperini.info.format, FileFormat::Md);
    assert!(gasperini.data.url.starts_with("https://osf.io/download/"));
}

#[test]
fn every_builtin_url_is_https() {
    let registry = Registry::builtin().expect("load builtin registry");
    for task in registry.tasks() {
        for dataset in task.datasets() {
            let mut urls = vec![&dataset.data.url, &dataset.info.url];
            urls.extend(dataset.raw.as_ref().map(|raw| &raw.url));
            for url in urls {
                assert!(url.starts_with("https://"), "{}/{}: {url}", task.kind, dataset.key);
            }
        }
    }
}

#[test]
fn eqtl_dataset_renames_pip_to_score() {
    let registry = Registry::builtin().expect("load builtin registry");
    let adipose = registry
        .dataset("eqtl", "Adipose_Subcutaneous")
        .expect("adipose config");
    assert_eq!(adipose.schema.source_for("score"), "pip");
    assert_eq!(
        adipose.raw.as_ref().map(|raw| raw.format),
        Some(FileFormat::Parquet)
    );
    let task = registry.task("eqtl").expect("eqtl task");
    assert_eq!(task.export_columns.first().map(String::as_str), Some("chr"));
    assert_eq!(task.export_columns.last().map(String::as_str), Some("label"));
}

#[test]
fn unknown_dataset_lists_available_keys() {
    let registry = Registry::builtin().expect("load builtin registry");
    let err = registry.dataset("enhancer", "Nasser").unwrap_err();
    match &err {
        RegistryError::ConfigNotFound { kind, key, available } => {
            assert_eq!(*kind, "dataset");
            assert_eq!(key, "Nasser");
            assert_eq!(available.len(), 4);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Fulco"));
}

#[test]
fn unknown_task_lists_available_tasks() {
    let registry = Registry::builtin().expect("load builtin registry");
    let err = registry.datasets("chromatin").unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown task 'chromatin' (available: enhancer, eqtl)"
    );
}

#[test]
fn genome_builds() {
    let registry = Registry::builtin().expect("load builtin registry");
    let hg38 = registry.genome("hg38").expect("hg38");
    assert!(hg38.gtf_url.ends_with("gencode.v47.annotation.gtf.gz"));
    assert_eq!(registry.genomes().count(), 3);
    assert!(matches!(
        registry.genome("hg18"),
        Err(RegistryError::ConfigNotFound { .. })
    ));
}

#[test]
fn loads_registry_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("registry.toml");
    std::fs::write(
        &path,
        r#"
[registry]
schema = "gbench.dataset-registry"
schema_version = 1

[tasks.enhancer]
columns = ["chr", "start", "end", "gene_name", "score", "label"]

[tasks.enhancer.datasets.Local]
name = "Local screen"
genome_version = "hg19"
data = { url = "file:///tmp/local.csv", format = "csv" }
info = { url = "file:///tmp/local.md", format = "md" }
"#,
    )
    .expect("write registry");

    let registry = Registry::from_path(&path).expect("load registry file");
    let local = registry.dataset("enhancer", "Local").expect("local dataset");
    assert_eq!(local.schema.file_format, FileFormat::Csv);
    assert!(registry.genome("hg38").is_err());
}

#[test]
fn missing_registry_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Registry::from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, RegistryError::Io { .. }));
}
