//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use clap_complete::Shell;

/// UCUM terminology checker: validate unit codes, convert values, and search the unit catalog
///
/// Positional conventions: no arguments (everything from the property file),
/// `<path> <code>` for validation, `<path> <value> <source> <destination>`
/// for conversion.
#[derive(Parser, Debug)]
#[command(name = "ucumcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Operation arguments: none, `<path> <code>`, or `<path> <value> <source-unit> <dest-unit>`
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Search the unit catalog for a keyword instead of validating/converting
    #[arg(short = 's', long, value_name = "KEYWORD")]
    pub search: Option<String>,

    /// Property file (TOML); defaults to ./ucumcheck.toml, then the XDG config dir
    #[arg(short = 'f', long, env = "UCUMCHECK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug output (-d: info, -dd: debug, -ddd: trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print a template property file and exit
    #[arg(long)]
    pub template: bool,

    /// Generate shell completion scripts
    #[arg(long = "completions", value_enum, value_name = "SHELL")]
    pub generator: Option<Shell>,

    /// Print author and version information
    #[arg(long)]
    pub info: bool,
}
