//! Random access to reference sequence through a `.fai` index.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{IngestError, Result};

/// Read-only base lookup shared across worker threads.
pub trait SequenceSource: Send + Sync {
    /// Bases in `[start, end)` of `chr`, 0-based half-open.
    fn fetch(&self, chr: &str, start: u64, end: u64) -> Result<String>;
}

/// One line of a samtools-style `.fai` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaiEntry {
    pub name: String,
    pub length: u64,
    /// Byte offset of the first base.
    pub offset: u64,
    pub line_bases: u64,
    /// Bytes per line including the line terminator.
    pub line_width: u64,
}

impl FaiEntry {
    fn from_line(line: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            return Err(format!("expected 5 fields, found {}", fields.len()));
        }
        let number = |idx: usize, label: &str| {
            fields[idx]
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("invalid {label} '{}'", fields[idx]))
        };
        Ok(Self {
            name: fields[0].to_string(),
            length: number(1, "length")?,
            offset: number(2, "offset")?,
            line_bases: number(3, "line bases")?,
            line_width: number(4, "line width")?,
        })
    }

    fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.length, self.offset, self.line_bases, self.line_width
        )
    }

    /// File offset of a 0-based position, accounting for line wrapping.
    fn position_to_offset(&self, position: u64) -> u64 {
        if self.line_bases == 0 {
            return self.offset;
        }
        let line = position / self.line_bases;
        let column = position % self.line_bases;
        self.offset + line * self.line_width + column
    }
}

/// Sequence name -> index entry.
#[derive(Debug, Clone, Default)]
pub struct FaiIndex {
    entries: HashMap<String, FaiEntry>,
    order: Vec<String>,
}

impl FaiIndex {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
        let mut index = Self::default();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| IngestError::read(path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = FaiEntry::from_line(&line).map_err(|message| IngestError::FastaIndex {
                path: path.to_path_buf(),
                message: format!("line {}: {message}", idx + 1),
            })?;
            index.push(entry);
        }
        Ok(index)
    }

    /// Scan a FASTA file and build its index.
    ///
    /// Every sequence line except the last of a record must have the same
    /// length, or random access would land on the wrong base.
    pub fn build(fasta_path: &Path) -> Result<Self> {
        let file = File::open(fasta_path).map_err(|e| IngestError::read(fasta_path, e))?;
        let mut reader = BufReader::new(file);
        let mut index = Self::default();
        let mut current: Option<FaiEntry> = None;
        let mut short_line_seen = false;
        let mut byte_offset: u64 = 0;
        let mut buffer = String::new();

        loop {
            buffer.clear();
            let bytes_read = reader
                .read_line(&mut buffer)
                .map_err(|e| IngestError::read(fasta_path, e))? as u64;
            if bytes_read == 0 {
                break;
            }

            if let Some(header) = buffer.strip_prefix('>') {
                if let Some(entry) = current.take() {
                    index.push(entry);
                }
                let name = header.split_whitespace().next().ok_or_else(|| {
                    IngestError::FastaIndex {
                        path: fasta_path.to_path_buf(),
                        message: format!("empty sequence name at byte {byte_offset}"),
                    }
                })?;
                current = Some(FaiEntry {
                    name: name.to_string(),
                    length: 0,
                    offset: byte_offset + bytes_read,
                    line_bases: 0,
                    line_width: 0,
                });
                short_line_seen = false;
            } else if let Some(entry) = current.as_mut() {
                let bases = buffer.trim_end_matches(['\n', '\r']).len() as u64;
                if bases > 0 {
                    if entry.line_bases == 0 {
                        entry.line_bases = bases;
                        entry.line_width = bytes_read;
                    } else if short_line_seen || bases > entry.line_bases {
                        return Err(IngestError::FastaIndex {
                            path: fasta_path.to_path_buf(),
                            message: format!("uneven line lengths in sequence '{}'", entry.name),
                        });
                    }
                    if bases < entry.line_bases {
                        short_line_seen = true;
                    }
                    entry.length += bases;
                }
            }
            byte_offset += bytes_read;
        }
        if let Some(entry) = current.take() {
            index.push(entry);
        }
        Ok(index)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|e| IngestError::write(path, e))?;
        for name in &self.order {
            if let Some(entry) = self.entries.get(name) {
                writeln!(file, "{}", entry.to_line()).map_err(|e| IngestError::write(path, e))?;
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FaiEntry> {
        self.entries.get(name)
    }

    /// Sequence names in file order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, entry: FaiEntry) {
        self.order.push(entry.name.clone());
        self.entries.insert(entry.name.clone(), entry);
    }
}

/// An uncompressed FASTA file paired with its index.
///
/// Each fetch opens its own file handle, so one instance can serve many
/// threads.
#[derive(Debug, Clone)]
pub struct IndexedFasta {
    path: PathBuf,
    index: FaiIndex,
}

impl IndexedFasta {
    /// Open `path`, reading `<path>.fai` or building and saving it when absent.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(IngestError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let index_path = fai_path(path);
        let index = if index_path.exists() {
            FaiIndex::from_path(&index_path)?
        } else {
            info!(path = %path.display(), "building FASTA index");
            let index = FaiIndex::build(path)?;
            index.write(&index_path)?;
            index
        };
        Ok(Self::with_index(path, index))
    }

    pub fn with_index(path: &Path, index: FaiIndex) -> Self {
        Self {
            path: path.to_path_buf(),
            index,
        }
    }

    pub fn index(&self) -> &FaiIndex {
        &self.index
    }
}

impl SequenceSource for IndexedFasta {
    fn fetch(&self, chr: &str, start: u64, end: u64) -> Result<String> {
        let entry = self
            .index
            .get(chr)
            .ok_or_else(|| IngestError::SequenceNotFound {
                name: chr.to_string(),
            })?;
        if start >= end || end > entry.length {
            return Err(IngestError::InvalidRegion {
                name: chr.to_string(),
                start,
                end,
                length: entry.length,
            });
        }

        let mut file = File::open(&self.path).map_err(|e| IngestError::read(&self.path, e))?;
        let first = entry.position_to_offset(start);
        let last = entry.position_to_offset(end - 1);
        file.seek(SeekFrom::Start(first))
            .map_err(|e| IngestError::read(&self.path, e))?;
        let mut raw = Vec::new();
        file.take(last - first + 1)
            .read_to_end(&mut raw)
            .map_err(|e| IngestError::read(&self.path, e))?;

        Ok(raw
            .into_iter()
            .filter(|b| *b != b'\n' && *b != b'\r')
            .map(char::from)
            .collect())
    }
}

/// `<fasta>.fai`.
pub fn fai_path(fasta: &Path) -> PathBuf {
    let mut name = fasta.as_os_str().to_os_string();
    name.push(".fai");
    PathBuf::from(name)
}
