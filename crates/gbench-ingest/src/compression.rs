//! Transparent gzip handling for annotation and reference downloads.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use tracing::info;

use crate::error::{IngestError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// True when the file starts with the gzip magic bytes.
pub fn is_gzip(path: &Path) -> Result<bool> {
    let mut reader = BufReader::new(File::open(path).map_err(|e| IngestError::read(path, e))?);
    let head = reader.fill_buf().map_err(|e| IngestError::read(path, e))?;
    Ok(head.starts_with(&GZIP_MAGIC))
}

/// Buffered reader over a plain or gzip-compressed file.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    if is_gzip(path)? {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Path with a trailing `.gz` removed, or `None` if there is none.
pub fn strip_gz_suffix(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(".gz")?;
    Some(path.with_file_name(stem))
}

/// Sibling path used while a file is being written.
pub(crate) fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Decompress `source` next to itself unless the target already exists.
///
/// Returns the decompressed path. Files that are not gzip are returned as-is.
pub fn decompress_in_place(source: &Path, force: bool) -> Result<PathBuf> {
    if !is_gzip(source)? {
        return Ok(source.to_path_buf());
    }
    let target = strip_gz_suffix(source).unwrap_or_else(|| source.with_extension("out"));
    if target.exists() && !force {
        return Ok(target);
    }

    info!(source = %source.display(), target = %target.display(), "decompressing");
    let input = File::open(source).map_err(|e| IngestError::read(source, e))?;
    let mut decoder = MultiGzDecoder::new(BufReader::new(input));
    let partial = partial_path(&target);
    let output = File::create(&partial).map_err(|e| IngestError::write(&partial, e))?;
    let mut writer = BufWriter::new(output);
    std::io::copy(&mut decoder, &mut writer).map_err(|e| IngestError::read(source, e))?;
    writer
        .into_inner()
        .map_err(|e| IngestError::write(&partial, e.into_error()))?;
    std::fs::rename(&partial, &target).map_err(|e| IngestError::write(&target, e))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Read, Write};

    fn write_gz(path: &Path, contents: &[u8]) {
        let file = File::create(path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(contents).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn reads_plain_and_gzip_text() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("genes.gtf");
        let packed = dir.path().join("genes.gtf.gz");
        std::fs::write(&plain, b"chr1\tgene\n").unwrap();
        write_gz(&packed, b"chr1\tgene\n");

        for path in [&plain, &packed] {
            let mut text = String::new();
            open_text(path).unwrap().read_to_string(&mut text).unwrap();
            assert_eq!(text, "chr1\tgene\n");
        }
        assert!(!is_gzip(&plain).unwrap());
        assert!(is_gzip(&packed).unwrap());
    }

    #[test]
    fn decompresses_next_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let packed = dir.path().join("genome.fa.gz");
        write_gz(&packed, b">chr1\nACGT\n");

        let target = decompress_in_place(&packed, false).unwrap();
        assert_eq!(target, dir.path().join("genome.fa"));
        assert_eq!(std::fs::read(&target).unwrap(), b">chr1\nACGT\n");
    }

    #[test]
    fn plain_file_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("genome.fa");
        std::fs::write(&plain, b">chr1\nACGT\n").unwrap();
        assert_eq!(decompress_in_place(&plain, false).unwrap(), plain);
    }

    #[test]
    fn strip_suffix() {
        assert_eq!(
            strip_gz_suffix(Path::new("/ref/gencode.v47.annotation.gtf.gz")),
            Some(PathBuf::from("/ref/gencode.v47.annotation.gtf"))
        );
        assert_eq!(strip_gz_suffix(Path::new("/ref/genome.fa")), None);
    }
}
