//! Serialized form of the registry file.

use std::collections::BTreeMap;

use gbench_model::FileFormat;
use serde::{Deserialize, Serialize};

pub const REGISTRY_SCHEMA: &str = "gbench.dataset-registry";
pub const REGISTRY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    pub registry: RegistryHeader,
    #[serde(default)]
    pub genomes: BTreeMap<String, GenomeEntry>,
    pub tasks: BTreeMap<String, TaskEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeEntry {
    pub fasta_url: String,
    pub gtf_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEntry {
    pub columns: Vec<String>,
    #[serde(default)]
    pub export_columns: Vec<String>,
    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub genome_version: String,
    pub data: RemoteFile,
    pub info: RemoteFile,
    #[serde(default)]
    pub raw: Option<RemoteFile>,
    #[serde(default)]
    pub column_mapping: BTreeMap<String, String>,
}

/// A downloadable file and the format it is stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub url: String,
    pub format: FileFormat,
}
