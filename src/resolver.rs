//! Configuration/mode resolution
//!
//! Merges CLI positional arguments with property defaults into one immutable
//! [`ExecutionRequest`]. Explicit positional arguments always win over
//! property defaults. Argument-count conventions: 0 (fully defaulted),
//! 2 (`path code`, validation), 4 (`path value source destination`,
//! conversion); `--search` takes 0 or 1 (`path`) positional arguments.

use tracing::debug;

use crate::config::{ConfigError, ConfigResult, Settings};

/// The operation(s) a single invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Validate,
    Convert,
    ValidateThenConvert,
    Search,
}

/// Fully-resolved execution request, constructed once per invocation and
/// consumed exactly once by the dispatcher. Fields required by `mode` are
/// guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub mode: Mode,
    pub definition_path: String,
    pub candidate_code: Option<String>,
    pub conversion_value: Option<String>,
    pub source_unit: Option<String>,
    pub destination_unit: Option<String>,
    pub search_keyword: Option<String>,
}

/// A required field: trimmed and non-empty, otherwise the property key that
/// should have supplied it is reported as missing.
fn require(value: Option<String>, key: &'static str) -> ConfigResult<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingProperty(key))
}

/// Resolve CLI arguments and property defaults into an execution request.
pub fn resolve(
    cli_args: &[String],
    search_keyword: Option<&str>,
    settings: &Settings,
) -> ConfigResult<ExecutionRequest> {
    debug!(
        "resolving: {} positional args, search={:?}, validation={}, conversion={}",
        cli_args.len(),
        search_keyword,
        settings.code_validation,
        settings.code_conversion
    );

    // The search entry point historically consulted no mode toggles.
    if let Some(keyword) = search_keyword {
        return resolve_search(cli_args, keyword, settings);
    }

    let validation = settings.code_validation;
    let conversion = settings.code_conversion;
    if !validation && !conversion {
        return Err(ConfigError::NoModeEnabled);
    }
    let mode = if validation && conversion {
        Mode::ValidateThenConvert
    } else if validation {
        Mode::Validate
    } else {
        Mode::Convert
    };

    let mut definition_path: Option<String> = None;
    let mut candidate_code: Option<String> = None;
    let mut conversion_value: Option<String> = None;
    let mut source_unit: Option<String> = None;
    let mut destination_unit: Option<String> = None;

    match cli_args.len() {
        0 => {}
        2 if validation => {
            definition_path = Some(cli_args[0].clone());
            candidate_code = Some(cli_args[1].clone());
        }
        4 if conversion => {
            definition_path = Some(cli_args[0].clone());
            conversion_value = Some(cli_args[1].clone());
            source_unit = Some(cli_args[2].clone());
            destination_unit = Some(cli_args[3].clone());
        }
        count => {
            return Err(ConfigError::InvalidArgumentCount {
                count,
                expected: expected_counts(validation, conversion),
            });
        }
    }

    let definition_path = require(
        definition_path.or_else(|| settings.essence_path().map(String::from)),
        "ucum.essence.path",
    )?;

    let candidate_code = if validation {
        Some(require(
            candidate_code.or_else(|| settings.default_code().map(String::from)),
            "ucum.default.code",
        )?)
    } else {
        None
    };

    let (conversion_value, source_unit, destination_unit) = if conversion {
        (
            Some(require(
                conversion_value.or_else(|| settings.conversion_value().map(String::from)),
                "conversion.value",
            )?),
            Some(require(
                source_unit.or_else(|| settings.source_unit().map(String::from)),
                "conversion.source.unit",
            )?),
            Some(require(
                destination_unit.or_else(|| settings.destination_unit().map(String::from)),
                "conversion.destination.unit",
            )?),
        )
    } else {
        (None, None, None)
    };

    Ok(ExecutionRequest {
        mode,
        definition_path,
        candidate_code,
        conversion_value,
        source_unit,
        destination_unit,
        search_keyword: None,
    })
}

fn resolve_search(
    cli_args: &[String],
    keyword: &str,
    settings: &Settings,
) -> ConfigResult<ExecutionRequest> {
    let definition_path = match cli_args.len() {
        0 => None,
        1 => Some(cli_args[0].clone()),
        count => {
            return Err(ConfigError::InvalidArgumentCount {
                count,
                expected: "0 or 1 with --search",
            });
        }
    };
    let definition_path = require(
        definition_path.or_else(|| settings.essence_path().map(String::from)),
        "ucum.essence.path",
    )?;

    Ok(ExecutionRequest {
        mode: Mode::Search,
        definition_path,
        candidate_code: None,
        conversion_value: None,
        source_unit: None,
        destination_unit: None,
        // The empty keyword is valid and matches every entry.
        search_keyword: Some(keyword.to_string()),
    })
}

fn expected_counts(validation: bool, conversion: bool) -> &'static str {
    match (validation, conversion) {
        (true, true) => "0, 2, or 4",
        (true, false) => "0 or 2",
        _ => "0 or 4",
    }
}
