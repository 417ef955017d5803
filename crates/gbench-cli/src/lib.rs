//! Library side of the `gbench` command-line tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
