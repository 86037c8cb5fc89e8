//! CLI layer: argument parsing, command execution, error mapping

pub mod args;
pub mod commands;
pub mod error;

pub use args::Cli;
pub use error::{CliError, CliResult};
