//! Mode dispatch
//!
//! Single pass over the resolved request, one engine invocation per requested
//! operation, no retries. `ValidateThenConvert` fails fast: a validation
//! rejection is the outcome and conversion is not attempted.

use tracing::info;

use crate::engine::{SemanticError, UnitSemanticsEngine};
use crate::resolver::{ExecutionRequest, Mode};
use crate::search::{search, SearchResult};

/// Successful validation: `valid` is always true here, failures travel as
/// `Err(SemanticError)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub analysis_detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub value: f64,
    pub unit: String,
}

/// Success outcome of a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome<'a> {
    Validation(ValidationResult),
    Conversion(ConversionResult),
    ValidationAndConversion {
        validation: ValidationResult,
        conversion: ConversionResult,
    },
    Search(SearchResult<'a>),
}

/// Run the operation(s) the request names against the engine.
pub fn dispatch<'e>(
    request: &ExecutionRequest,
    engine: &'e dyn UnitSemanticsEngine,
) -> Result<ExecutionOutcome<'e>, SemanticError> {
    match request.mode {
        Mode::Validate => Ok(ExecutionOutcome::Validation(validate(request, engine)?)),
        Mode::Convert => Ok(ExecutionOutcome::Conversion(convert(request, engine)?)),
        Mode::ValidateThenConvert => {
            // First error wins: a validation failure is the outcome and
            // conversion is never attempted.
            let validation = validate(request, engine)?;
            let conversion = convert(request, engine)?;
            Ok(ExecutionOutcome::ValidationAndConversion {
                validation,
                conversion,
            })
        }
        Mode::Search => {
            let keyword = request.search_keyword.as_deref().unwrap_or("");
            Ok(ExecutionOutcome::Search(search(engine.catalog(), keyword)))
        }
    }
}

fn validate(
    request: &ExecutionRequest,
    engine: &dyn UnitSemanticsEngine,
) -> Result<ValidationResult, SemanticError> {
    let code = request.candidate_code.as_deref().unwrap_or("");
    info!("analysing UCUM code {:?}", code);
    let analysis_detail = engine.analyse(code)?;
    Ok(ValidationResult {
        valid: true,
        analysis_detail,
    })
}

fn convert(
    request: &ExecutionRequest,
    engine: &dyn UnitSemanticsEngine,
) -> Result<ConversionResult, SemanticError> {
    let value = request.conversion_value.as_deref().unwrap_or("");
    let source = request.source_unit.as_deref().unwrap_or("");
    let destination = request.destination_unit.as_deref().unwrap_or("");
    info!("converting {} {} -> {}", value, source, destination);
    let converted = engine.convert(value, source, destination)?;
    Ok(ConversionResult {
        value: converted,
        unit: destination.to_string(),
    })
}
