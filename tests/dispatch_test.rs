//! Tests for the mode dispatcher, using a stub engine

use std::cell::Cell;

use ucumcheck::dispatch::{dispatch, ExecutionOutcome};
use ucumcheck::engine::{SemanticError, UnitCatalogEntry, UnitSemanticsEngine};
use ucumcheck::resolver::{ExecutionRequest, Mode};
use ucumcheck::util::testing;

/// Accepts a fixed set of codes and converts by a fixed factor; counts
/// convert invocations so fail-fast behavior can be asserted.
struct StubEngine {
    catalog: Vec<UnitCatalogEntry>,
    valid_codes: Vec<String>,
    factor: f64,
    convert_calls: Cell<u32>,
}

impl StubEngine {
    fn new(valid_codes: &[&str]) -> Self {
        Self {
            catalog: vec![UnitCatalogEntry {
                code: "g".to_string(),
                names: vec!["gram".to_string(), "gramme".to_string()],
            }],
            valid_codes: valid_codes.iter().map(|c| c.to_string()).collect(),
            factor: 2.0,
            convert_calls: Cell::new(0),
        }
    }
}

impl UnitSemanticsEngine for StubEngine {
    fn catalog(&self) -> &[UnitCatalogEntry] {
        &self.catalog
    }

    fn analyse(&self, code: &str) -> Result<String, SemanticError> {
        if self.valid_codes.iter().any(|c| c == code) {
            Ok(format!("{code} (stub)"))
        } else {
            Err(SemanticError::UnknownCode(code.to_string()))
        }
    }

    fn convert(
        &self,
        value: &str,
        _source: &str,
        _destination: &str,
    ) -> Result<f64, SemanticError> {
        self.convert_calls.set(self.convert_calls.get() + 1);
        let numeric: f64 = value
            .parse()
            .map_err(|_| SemanticError::InvalidValue(value.to_string()))?;
        Ok(numeric * self.factor)
    }
}

fn request(mode: Mode) -> ExecutionRequest {
    ExecutionRequest {
        mode,
        definition_path: "/defs/ucum-essence.xml".to_string(),
        candidate_code: Some("mg".to_string()),
        conversion_value: Some("10".to_string()),
        source_unit: Some("kg".to_string()),
        destination_unit: Some("[lb_av]".to_string()),
        search_keyword: None,
    }
}

#[test]
fn given_valid_code_when_validating_then_validation_result() {
    testing::init_test_setup();
    let engine = StubEngine::new(&["mg"]);

    let outcome = dispatch(&request(Mode::Validate), &engine).expect("engine accepts mg");

    match outcome {
        ExecutionOutcome::Validation(validation) => {
            assert!(validation.valid);
            assert_eq!(validation.analysis_detail, "mg (stub)");
        }
        other => panic!("expected validation outcome, got {:?}", other),
    }
}

#[test]
fn given_unknown_code_when_validating_then_semantic_error() {
    testing::init_test_setup();
    let engine = StubEngine::new(&[]);

    let err = dispatch(&request(Mode::Validate), &engine).expect_err("engine rejects mg");

    assert!(matches!(err, SemanticError::UnknownCode(_)));
}

#[test]
fn given_conversion_request_when_converting_then_result_carries_destination_unit() {
    testing::init_test_setup();
    let engine = StubEngine::new(&[]);

    let outcome = dispatch(&request(Mode::Convert), &engine).expect("stub converts");

    match outcome {
        ExecutionOutcome::Conversion(conversion) => {
            assert_eq!(conversion.value, 20.0);
            assert_eq!(conversion.unit, "[lb_av]");
        }
        other => panic!("expected conversion outcome, got {:?}", other),
    }
    assert_eq!(engine.convert_calls.get(), 1);
}

#[test]
fn given_malformed_code_when_validating_then_converting_then_conversion_is_not_attempted() {
    testing::init_test_setup();
    let engine = StubEngine::new(&[]);

    let err = dispatch(&request(Mode::ValidateThenConvert), &engine)
        .expect_err("validation fails first");

    assert!(matches!(err, SemanticError::UnknownCode(_)));
    // fail-fast: the failed validation masks nothing, conversion never ran
    assert_eq!(engine.convert_calls.get(), 0);
}

#[test]
fn given_valid_code_when_validating_then_converting_then_both_results_returned() {
    testing::init_test_setup();
    let engine = StubEngine::new(&["mg"]);

    let outcome =
        dispatch(&request(Mode::ValidateThenConvert), &engine).expect("both operations pass");

    match outcome {
        ExecutionOutcome::ValidationAndConversion {
            validation,
            conversion,
        } => {
            assert!(validation.valid);
            assert_eq!(conversion.value, 20.0);
        }
        other => panic!("expected combined outcome, got {:?}", other),
    }
    assert_eq!(engine.convert_calls.get(), 1);
}

#[test]
fn given_search_request_when_dispatching_then_catalog_is_scanned() {
    testing::init_test_setup();
    let engine = StubEngine::new(&[]);
    let mut request = request(Mode::Search);
    request.search_keyword = Some("gr".to_string());

    let outcome = dispatch(&request, &engine).expect("search never fails");

    match outcome {
        ExecutionOutcome::Search(result) => {
            assert!(result.found);
            assert_eq!(result.matches[0].code, "g");
        }
        other => panic!("expected search outcome, got {:?}", other),
    }
}
