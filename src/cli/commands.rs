//! Command execution: resolve, verify the definition file, load the engine,
//! dispatch, report.

use std::path::Path;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;
use crate::dispatch::{dispatch, ConversionResult, ExecutionOutcome, ValidationResult};
use crate::engine::{EssenceEngine, UnitSemanticsEngine};
use crate::resolver::resolve;
use crate::search::SearchResult;

/// Run one invocation end to end. The first error terminates the run.
#[instrument(skip(settings))]
pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    let request = resolve(&cli.args, cli.search.as_deref(), settings)?;
    debug!("resolved request: {:?}", request);

    // Verified before any engine call.
    let definition_path = Path::new(&request.definition_path);
    if !definition_path.is_file() {
        return Err(CliError::DefinitionFileNotFound(
            definition_path.to_path_buf(),
        ));
    }

    let engine = EssenceEngine::load(definition_path)?;
    debug!("catalog holds {} entries", engine.catalog().len());

    let outcome = dispatch(&request, &engine)?;
    report(&outcome, request.search_keyword.as_deref().unwrap_or(""));
    Ok(())
}

fn report(outcome: &ExecutionOutcome, keyword: &str) {
    match outcome {
        ExecutionOutcome::Validation(validation) => print_validation(validation),
        ExecutionOutcome::Conversion(conversion) => print_conversion(conversion),
        ExecutionOutcome::ValidationAndConversion {
            validation,
            conversion,
        } => {
            print_validation(validation);
            print_conversion(conversion);
        }
        ExecutionOutcome::Search(result) => print_search(result, keyword),
    }
}

fn print_validation(validation: &ValidationResult) {
    println!("The UCUM code is VALID.");
    println!("Analysis: {}", validation.analysis_detail);
}

fn print_conversion(conversion: &ConversionResult) {
    println!("Conversion result: {} {}", conversion.value, conversion.unit);
}

fn print_search(result: &SearchResult, keyword: &str) {
    for entry in &result.matches {
        println!("------------------------------------");
        if entry.code.is_empty() {
            println!("Code: (no code)");
        } else {
            println!("Code: {}", entry.code);
        }
        if entry.names.is_empty() {
            println!("Names: (no names defined)");
        } else {
            println!("Names: {}", entry.names.iter().join(" ; "));
        }
    }
    if !result.found {
        println!("No unit matches the keyword: {:?}", keyword);
    }
}
