use std::path::Path;

use anyhow::{Context, Result, bail};
use gbench_ingest::write_table;
use gbench_model::FileFormat;
use polars::prelude::DataFrame;
use tracing::info;

use crate::common::ensure_parent_dir;

/// Write a table as tab-separated text with a header row, replacing any
/// existing file.
pub fn write_tsv(df: &DataFrame, path: &Path) -> Result<()> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(FileFormat::Tsv.extension()) {
        bail!("TSV output must use a .tsv extension: {}", path.display());
    }
    ensure_parent_dir(path)?;
    let mut out = df.clone();
    write_table(&mut out, path).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), rows = df.height(), "saved processed table");
    Ok(())
}
