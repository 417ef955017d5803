//! Type-safe enumerations for benchmark metadata.
//!
//! Registry files and source tables spell these as strings; parsing them once
//! at the boundary keeps the rest of the pipeline free of string matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Dataset family. Each family has its own feature-derivation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Enhancer–gene pairs from CRISPR perturbation screens.
    Enhancer,
    /// Fine-mapped expression QTLs.
    Eqtl,
}

impl TaskKind {
    pub const ALL: [TaskKind; 2] = [TaskKind::Enhancer, TaskKind::Eqtl];

    /// Registry key for this task.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Enhancer => "enhancer",
            TaskKind::Eqtl => "eqtl",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enhancer" => Ok(TaskKind::Enhancer),
            "eqtl" => Ok(TaskKind::Eqtl),
            _ => Err(format!("Unknown task: {s}")),
        }
    }
}

/// File formats known to the fetcher and the table codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Tsv,
    Xlsx,
    Parquet,
    /// Markdown dataset descriptions; downloadable but not tabular.
    Md,
}

impl FileFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Tsv => "tsv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Parquet => "parquet",
            FileFormat::Md => "md",
        }
    }

    /// Whether the table codec can read and write this format.
    pub fn is_tabular(&self) -> bool {
        !matches!(self, FileFormat::Md)
    }

    /// Resolve a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        ext.parse().ok()
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "tsv" => Ok(FileFormat::Tsv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "parquet" => Ok(FileFormat::Parquet),
            "md" => Ok(FileFormat::Md),
            _ => Err(ModelError::UnknownFormat(s.to_string())),
        }
    }
}

/// Genomic strand of a gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Strand {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            other => Err(ModelError::UnknownStrand(other.to_string())),
        }
    }
}
