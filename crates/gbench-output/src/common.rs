use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gbench_model::{FileFormat, TaskKind};

/// `<root>/<task>/<dataset>/<file_name or dataset>.tsv`.
pub fn processed_output_path(
    root: &Path,
    task: TaskKind,
    dataset: &str,
    file_name: Option<&str>,
) -> PathBuf {
    let stem = file_name.filter(|name| !name.is_empty()).unwrap_or(dataset);
    root.join(task.as_str())
        .join(dataset)
        .join(format!("{stem}.{}", FileFormat::Tsv.extension()))
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    Ok(())
}
