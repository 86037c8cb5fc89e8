//! CLI-level errors (wrap configuration and engine errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::engine::{EssenceError, SemanticError};
use crate::exitcode;

/// Top-level error type; what gets displayed to the user and mapped to a
/// process exit code.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("UCUM definition file not found: {0}")]
    DefinitionFileNotFound(PathBuf),

    #[error("{0}")]
    Semantic(#[from] SemanticError),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => exitcode::CONFIG,
            CliError::DefinitionFileNotFound(_) => exitcode::NODEFINITION,
            CliError::Semantic(_) => exitcode::SEMANTIC,
            CliError::Unexpected(_) => exitcode::UNEXPECTED,
        }
    }
}

impl From<EssenceError> for CliError {
    fn from(e: EssenceError) -> Self {
        match e {
            // I/O problems are unexpected; malformed XML counts as a
            // semantic rejection of the definition file, as the original.
            EssenceError::Io(err) => CliError::Unexpected(format!("reading essence file: {err}")),
            EssenceError::Xml(_) | EssenceError::Structure(_) => {
                CliError::Semantic(SemanticError::MalformedDefinitions(e.to_string()))
            }
        }
    }
}
