//! Shared utilities for gbench crates.
//!
//! Holds the polars `AnyValue` conversions and the typed column readers every
//! pipeline stage uses to pull values out of a `DataFrame` by column name.

pub mod polars;

pub use polars::{
    any_to_f64, any_to_i64, any_to_string, any_to_string_non_empty, column_f64, column_i64,
    column_strings, column_values, format_numeric, has_column, parse_f64, parse_i64,
};
