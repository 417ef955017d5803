//! Table reading and writing dispatched on file extension.
//!
//! Supported: `.csv`, `.tsv`, `.parquet` and `.xlsx`. Delimited files treat
//! the usual missing-value spellings (`NA`, `NaN`, `NULL`, ...) as nulls.

use std::fs::File;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use gbench_common::{any_to_f64, any_to_string};
use gbench_model::FileFormat;
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Strings read as null from delimited files.
const NULL_SPELLINGS: &[&str] = &["NA", "N/A", "NaN", "nan", "NULL", "null", "#N/A"];

const EMPTY_CELL: &Data = &Data::Empty;

/// Rows sampled for dtype inference in delimited files.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Tabular format for a path, from its extension.
pub fn table_format(path: &Path) -> Result<FileFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    FileFormat::from_extension(&extension)
        .filter(FileFormat::is_tabular)
        .ok_or(IngestError::UnsupportedFormat(extension))
}

/// Read a table, choosing the decoder from the file extension.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let format = table_format(path)?;
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = match format {
        FileFormat::Csv => read_delimited(path, b',')?,
        FileFormat::Tsv => read_delimited(path, b'\t')?,
        FileFormat::Parquet => {
            let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
            ParquetReader::new(file)
                .finish()
                .map_err(|e| parse_error(path, &e))?
        }
        FileFormat::Xlsx => read_xlsx(path)?,
        FileFormat::Md => return Err(IngestError::UnsupportedFormat(format.to_string())),
    };

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read table"
    );
    Ok(df)
}

/// Write a table, choosing the encoder from the file extension.
///
/// Parent directories are created and an existing file is overwritten.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let format = table_format(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::write(parent, e))?;
    }

    match format {
        FileFormat::Csv => write_delimited(df, path, b',')?,
        FileFormat::Tsv => write_delimited(df, path, b'\t')?,
        FileFormat::Parquet => {
            let file = File::create(path).map_err(|e| IngestError::write(path, e))?;
            ParquetWriter::new(file)
                .finish(df)
                .map_err(|e| write_error(path, &e))?;
        }
        FileFormat::Xlsx => write_xlsx(df, path)?,
        FileFormat::Md => return Err(IngestError::UnsupportedFormat(format.to_string())),
    }

    debug!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}

fn read_delimited(path: &Path, separator: u8) -> Result<DataFrame> {
    let null_values: Vec<PlSmallStr> = NULL_SPELLINGS.iter().map(|s| (*s).into()).collect();
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|opts| {
            opts.with_separator(separator)
                .with_null_values(Some(NullValues::AllColumns(null_values.clone())))
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| parse_error(path, &e))?
        .finish()
        .map_err(|e| parse_error(path, &e))
}

fn write_delimited(df: &mut DataFrame, path: &Path, separator: u8) -> Result<()> {
    let mut file = File::create(path).map_err(|e| IngestError::write(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(separator)
        .finish(df)
        .map_err(|e| write_error(path, &e))
}

fn read_xlsx(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(path, &e))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::TableParse {
            path: path.to_path_buf(),
            message: "workbook has no sheets".to_string(),
        })?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| parse_error(path, &e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            Data::Empty => format!("Unnamed: {idx}"),
            other => other.to_string(),
        })
        .collect();

    let body: Vec<&[Data]> = rows.collect();
    let columns = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(EMPTY_CELL))
                .collect();
            xlsx_column(name, &cells)
        })
        .collect();
    DataFrame::new(columns).map_err(|e| parse_error(path, &e))
}

/// Narrowest column type that holds every non-empty cell.
fn xlsx_column(name: &str, cells: &[&Data]) -> Column {
    let filled = || cells.iter().filter(|cell| !matches!(cell, Data::Empty));
    let integral = |cell: &&&Data| match cell {
        Data::Int(_) => true,
        Data::Float(v) => v.fract() == 0.0 && v.abs() < 9.0e15,
        _ => false,
    };

    if filled().all(|cell| matches!(cell, Data::Bool(_))) && filled().next().is_some() {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }
    if filled().all(|cell| integral(&cell)) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Int(v) => Some(*v),
                Data::Float(v) => Some(*v as i64),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }
    if filled().all(|cell| matches!(cell, Data::Int(_) | Data::Float(_))) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Int(v) => Some(*v as f64),
                Data::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }
    let values: Vec<Option<String>> = cells
        .iter()
        .map(|cell| match cell {
            Data::Empty => None,
            other => Some(other.to_string()),
        })
        .collect();
    Column::new(name.into(), values)
}

fn write_xlsx(df: &DataFrame, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col_idx, column) in df.get_columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| IngestError::TableWrite {
            path: path.to_path_buf(),
            message: format!("too many columns for a worksheet: {}", df.width()),
        })?;
        sheet
            .write_string(0, col, column.name().as_str())
            .map_err(|e| write_error(path, &e))?;

        for row_idx in 0..df.height() {
            let row = u32::try_from(row_idx + 1).map_err(|_| IngestError::TableWrite {
                path: path.to_path_buf(),
                message: format!("too many rows for a worksheet: {}", df.height()),
            })?;
            let value = column.get(row_idx)?;
            let written = match value {
                AnyValue::Null => continue,
                AnyValue::Boolean(b) => sheet.write_boolean(row, col, b),
                AnyValue::String(s) => sheet.write_string(row, col, s),
                AnyValue::StringOwned(ref s) => sheet.write_string(row, col, s.as_str()),
                other => match any_to_f64(other.clone()) {
                    Some(number) => sheet.write_number(row, col, number),
                    None => sheet.write_string(row, col, any_to_string(other)),
                },
            };
            written.map_err(|e| write_error(path, &e))?;
        }
    }

    workbook.save(path).map_err(|e| write_error(path, &e))
}

fn parse_error(path: &Path, err: &dyn std::fmt::Display) -> IngestError {
    IngestError::TableParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn write_error(path: &Path, err: &dyn std::fmt::Display) -> IngestError {
    IngestError::TableWrite {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
