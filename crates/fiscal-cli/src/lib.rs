//! Fiscal Extract CLI library.
//!
//! Configuration loading, the batch runner that turns a directory tree into
//! output rows, the CSV artifact and operator-facing formatting.

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod sink;

pub use batch::{build_extractor, BatchReport, BatchRunner};
pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use sink::{default_output_path, CsvSink};
