use std::collections::BTreeMap;
use std::path::Path;

use gbench_model::{SchemaConfig, TaskKind};
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::manifest::{
    DatasetEntry, REGISTRY_SCHEMA, REGISTRY_SCHEMA_VERSION, RegistryFile, RemoteFile, TaskEntry,
};
use crate::paths::registry_override;

const BUILTIN_REGISTRY: &str = include_str!("../data/registry.toml");

/// Resolved configuration for one (task, dataset) pair.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub task: TaskKind,
    /// Registry key, e.g. `Fulco`.
    pub key: String,
    pub name: String,
    pub description: String,
    pub genome_version: String,
    pub data: RemoteFile,
    pub info: RemoteFile,
    pub raw: Option<RemoteFile>,
    /// Canonical columns plus the source renames for this dataset.
    pub schema: SchemaConfig,
}

#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub kind: TaskKind,
    pub columns: Vec<String>,
    /// Columns written to the processed table, in order.
    pub export_columns: Vec<String>,
    datasets: BTreeMap<String, DatasetConfig>,
}

impl TaskConfig {
    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn datasets(&self) -> impl Iterator<Item = &DatasetConfig> {
        self.datasets.values()
    }
}

/// Reference genome download locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeConfig {
    pub build: String,
    pub fasta_url: String,
    pub gtf_url: String,
}

/// Immutable lookup of tasks, datasets and genome builds.
///
/// Every dataset schema is validated when the registry is built, so lookups
/// only fail on unknown keys.
#[derive(Debug, Clone)]
pub struct Registry {
    tasks: BTreeMap<TaskKind, TaskConfig>,
    genomes: BTreeMap<String, GenomeConfig>,
}

impl Registry {
    /// The registry compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_REGISTRY, "<builtin>")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    /// `GBENCH_REGISTRY` when set, otherwise the built-in registry.
    pub fn load_default() -> Result<Self> {
        match registry_override() {
            Some(path) => {
                debug!(path = %path.display(), "loading registry override");
                Self::from_path(&path)
            }
            None => Self::builtin(),
        }
    }

    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(contents).map_err(|e| RegistryError::Toml {
            origin: origin.to_string(),
            source: e,
        })?;
        Self::from_file(file)
    }

    fn from_file(file: RegistryFile) -> Result<Self> {
        if file.registry.schema != REGISTRY_SCHEMA {
            return Err(RegistryError::InvalidRegistry {
                message: format!("unsupported schema: {}", file.registry.schema),
            });
        }
        if file.registry.schema_version != REGISTRY_SCHEMA_VERSION {
            return Err(RegistryError::InvalidRegistry {
                message: format!(
                    "unsupported schema_version: {}",
                    file.registry.schema_version
                ),
            });
        }

        let mut tasks = BTreeMap::new();
        for (key, entry) in file.tasks {
            let kind: TaskKind = key
                .parse()
                .map_err(|message| RegistryError::InvalidRegistry { message })?;
            tasks.insert(kind, build_task(kind, entry)?);
        }

        let genomes = file
            .genomes
            .into_iter()
            .map(|(build, entry)| {
                let config = GenomeConfig {
                    build: build.clone(),
                    fasta_url: entry.fasta_url,
                    gtf_url: entry.gtf_url,
                };
                (build, config)
            })
            .collect();

        Ok(Self { tasks, genomes })
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskConfig> {
        self.tasks.values()
    }

    pub fn task(&self, task: &str) -> Result<&TaskConfig> {
        task.parse::<TaskKind>()
            .ok()
            .and_then(|kind| self.tasks.get(&kind))
            .ok_or_else(|| {
                RegistryError::not_found("task", task, self.tasks.keys().map(TaskKind::as_str))
            })
    }

    /// Dataset names registered for a task, sorted.
    pub fn datasets(&self, task: &str) -> Result<Vec<&str>> {
        Ok(self.task(task)?.dataset_names().collect())
    }

    /// Look up a dataset. An exact key match wins; otherwise the key is
    /// matched case-insensitively.
    pub fn dataset(&self, task: &str, dataset: &str) -> Result<&DatasetConfig> {
        let config = self.task(task)?;
        config
            .datasets
            .get(dataset)
            .or_else(|| {
                config
                    .datasets
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(dataset))
                    .map(|(_, value)| value)
            })
            .ok_or_else(|| RegistryError::not_found("dataset", dataset, config.dataset_names()))
    }

    pub fn genomes(&self) -> impl Iterator<Item = &GenomeConfig> {
        self.genomes.values()
    }

    pub fn genome(&self, build: &str) -> Result<&GenomeConfig> {
        self.genomes.get(build).ok_or_else(|| {
            RegistryError::not_found("genome build", build, self.genomes.keys().map(String::as_str))
        })
    }
}

fn build_task(kind: TaskKind, entry: TaskEntry) -> Result<TaskConfig> {
    if entry.columns.is_empty() {
        return Err(RegistryError::InvalidRegistry {
            message: format!("task '{kind}' declares no columns"),
        });
    }
    let export_columns = if entry.export_columns.is_empty() {
        entry.columns.clone()
    } else {
        entry.export_columns
    };

    let mut datasets = BTreeMap::new();
    for (key, dataset) in entry.datasets {
        let config = build_dataset(kind, &entry.columns, key.clone(), dataset)?;
        datasets.insert(key, config);
    }

    Ok(TaskConfig {
        kind,
        columns: entry.columns,
        export_columns,
        datasets,
    })
}

fn build_dataset(
    kind: TaskKind,
    columns: &[String],
    key: String,
    entry: DatasetEntry,
) -> Result<DatasetConfig> {
    let schema = SchemaConfig {
        canonical_columns: columns.to_vec(),
        column_mapping: entry.column_mapping,
        file_format: entry.data.format,
    };
    schema
        .validate()
        .map_err(|source| RegistryError::InvalidSchema {
            task: kind.to_string(),
            dataset: key.clone(),
            source,
        })?;
    if !entry.data.format.is_tabular() {
        return Err(RegistryError::InvalidRegistry {
            message: format!(
                "dataset '{kind}/{key}' has non-tabular data format '{}'",
                entry.data.format
            ),
        });
    }

    Ok(DatasetConfig {
        task: kind,
        key,
        name: entry.name,
        description: entry.description,
        genome_version: entry.genome_version,
        data: entry.data,
        info: entry.info,
        raw: entry.raw,
        schema,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[registry]
schema = "gbench.dataset-registry"
schema_version = 1

[tasks.eqtl]
columns = ["variant_id", "gene_name", "score"]

[tasks.eqtl.datasets.Toy]
name = "Toy"
genome_version = "hg38"
data = { url = "https://example.org/toy.tsv", format = "tsv" }
info = { url = "https://example.org/toy.md", format = "md" }
column_mapping = { score = "pip" }
"#;

    #[test]
    fn export_columns_default_to_columns() {
        let registry = Registry::from_toml_str(MINIMAL, "test").expect("parse registry");
        let task = registry.task("eqtl").expect("eqtl task");
        assert_eq!(task.export_columns, task.columns);
        let toy = registry.dataset("eqtl", "toy").expect("case-insensitive lookup");
        assert_eq!(toy.key, "Toy");
        assert!(toy.raw.is_none());
        assert_eq!(toy.schema.source_for("score"), "pip");
    }

    #[test]
    fn rejects_wrong_schema_version() {
        let contents = MINIMAL.replace("schema_version = 1", "schema_version = 2");
        let err = Registry::from_toml_str(&contents, "test").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidRegistry { .. }));
    }

    #[test]
    fn rejects_mapping_outside_canonical_columns() {
        let contents = MINIMAL.replace("score = \"pip\"", "pvalue = \"pip\"");
        let err = Registry::from_toml_str(&contents, "test").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidSchema { .. }));
        assert!(err.to_string().contains("eqtl/Toy"));
    }

    #[test]
    fn rejects_unknown_task_key() {
        let contents = MINIMAL.replace("tasks.eqtl", "tasks.chromatin");
        let err = Registry::from_toml_str(&contents, "test").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidRegistry { .. }));
    }

    #[test]
    fn rejects_markdown_data_file() {
        let contents = MINIMAL.replace("toy.tsv\", format = \"tsv\"", "toy.md\", format = \"md\"");
        let err = Registry::from_toml_str(&contents, "test").unwrap_err();
        assert!(err.to_string().contains("non-tabular"));
    }
}
