//! Unit semantics engine boundary
//!
//! The orchestrator consumes the engine through [`UnitSemanticsEngine`]; the
//! shipped implementation is the essence-backed adapter in [`essence`], which
//! covers atomic (optionally prefixed) codes. A full UCUM engine can be
//! slotted in behind the same trait.

pub mod essence;

pub use essence::{EssenceEngine, EssenceError};

use thiserror::Error;

/// One unit code plus its ordered list of human-readable alias names.
///
/// Produced once when the engine loads the definition file; read-only to the
/// search engine. `names` preserves document order and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCatalogEntry {
    pub code: String,
    pub names: Vec<String>,
}

/// Engine-side rejection of a code or conversion. All map to exit code 3.
#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("unknown or invalid UCUM code: '{0}'")]
    UnknownCode(String),

    #[error("unit expressions are not supported by this engine: '{0}'")]
    UnsupportedExpression(String),

    #[error("invalid numeric value: '{0}'")]
    InvalidValue(String),

    #[error("cannot convert between '{src}' and '{destination}': incommensurable units")]
    Incommensurable {
        src: String,
        destination: String,
    },

    #[error("unit '{0}' has no proportional scale (special or arbitrary unit)")]
    NotProportional(String),

    #[error("malformed unit definitions: {0}")]
    MalformedDefinitions(String),
}

/// The unit semantics engine consumed by the dispatcher and the search engine.
pub trait UnitSemanticsEngine {
    /// The defined-unit catalog in definition-file order.
    fn catalog(&self) -> &[UnitCatalogEntry];

    /// Semantically validate a code, returning a human-readable analysis.
    fn analyse(&self, code: &str) -> Result<String, SemanticError>;

    /// Convert a numeric value (given as string) between two units.
    fn convert(&self, value: &str, source: &str, destination: &str)
        -> Result<f64, SemanticError>;
}
