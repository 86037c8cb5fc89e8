//! Essence-backed engine adapter
//!
//! Parses ucum-essence.xml into prefix, base-unit, and defined-unit tables
//! and implements the engine trait for atomic codes: a defined unit, a base
//! unit, or a metric prefix followed by a metric unit. Conversion walks the
//! `<value Unit=... value=...>` links down to a base unit and compares scale
//! factors; special and arbitrary units are rejected. Unit expressions
//! (`kg/m2`, `m.s`) are outside this adapter.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

use super::{SemanticError, UnitCatalogEntry, UnitSemanticsEngine};

/// Errors while loading the definition file. XML problems surface as
/// `SemanticError::MalformedDefinitions` (exit 3, as the original service);
/// I/O problems are unexpected (exit 99).
#[derive(Error, Debug)]
pub enum EssenceError {
    #[error("failed to read essence file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed essence XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed essence XML: {0}")]
    Structure(String),
}

#[derive(Debug, Clone)]
struct Prefix {
    code: String,
    name: String,
    factor: f64,
}

#[derive(Debug, Clone)]
struct UnitDef {
    code: String,
    names: Vec<String>,
    property: String,
    metric: bool,
    special: bool,
    base: bool,
    /// Link to the unit this one is scaled against; `None` for base units
    /// and for units without a proportional scale.
    scale: Option<(String, f64)>,
}

impl UnitDef {
    fn display_names(&self) -> String {
        if self.names.is_empty() {
            self.code.clone()
        } else {
            self.names.join(", ")
        }
    }
}

/// Engine backed by a parsed ucum-essence.xml.
#[derive(Debug)]
pub struct EssenceEngine {
    catalog: Vec<UnitCatalogEntry>,
    units: HashMap<String, UnitDef>,
    prefixes: Vec<Prefix>,
}

#[derive(Debug, Default)]
struct Pending {
    code: String,
    names: Vec<String>,
    property: String,
    metric: bool,
    special: bool,
    scale_unit: Option<String>,
    scale_value: Option<f64>,
}

fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

impl Pending {
    fn from_element(e: &BytesStart) -> Self {
        // A missing Code attribute degrades to the empty string.
        Self {
            code: attr(e, b"Code").unwrap_or_default(),
            metric: attr(e, b"isMetric").as_deref() == Some("yes"),
            special: attr(e, b"isSpecial").as_deref() == Some("yes")
                || attr(e, b"isArbitrary").as_deref() == Some("yes"),
            ..Default::default()
        }
    }

    fn apply_value(&mut self, e: &BytesStart) -> Result<(), EssenceError> {
        self.scale_unit = attr(e, b"Unit");
        self.scale_value = match attr(e, b"value") {
            // Special units carry an empty value attribute; their function
            // element is ignored and they stay without a scale link.
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v.trim().parse().map_err(|_| {
                EssenceError::Structure(format!(
                    "element '{}' has a non-numeric value attribute: {v:?}",
                    self.code
                ))
            })?),
            None => None,
        };
        Ok(())
    }
}

impl EssenceEngine {
    /// Load the engine from a ucum-essence.xml file.
    pub fn load(path: &Path) -> Result<Self, EssenceError> {
        let content = std::fs::read_to_string(path)?;
        let engine = Self::parse(&content)?;
        debug!(
            "essence loaded: {} prefixes, {} units, {} catalog entries",
            engine.prefixes.len(),
            engine.units.len(),
            engine.catalog.len()
        );
        Ok(engine)
    }

    /// Parse a ucum-essence.xml document.
    pub fn parse(xml: &str) -> Result<Self, EssenceError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut catalog: Vec<UnitCatalogEntry> = Vec::new();
        let mut units: HashMap<String, UnitDef> = HashMap::new();
        let mut prefixes: Vec<Prefix> = Vec::new();

        let mut pending: Option<Pending> = None;
        let mut curr = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match tag.as_str() {
                        "prefix" | "base-unit" | "unit" => {
                            pending = Some(Pending::from_element(e));
                        }
                        "value" => {
                            if let Some(p) = pending.as_mut() {
                                p.apply_value(e)?;
                            }
                        }
                        _ => {}
                    }
                    curr = tag;
                }
                Event::Empty(ref e) => {
                    if e.name().as_ref() == b"value" {
                        if let Some(p) = pending.as_mut() {
                            p.apply_value(e)?;
                        }
                    }
                }
                Event::Text(e) => {
                    let txt = e.unescape()?;
                    if let Some(p) = pending.as_mut() {
                        match curr.as_str() {
                            "name" => p.names.push(txt.to_string()),
                            "property" => p.property = txt.to_string(),
                            _ => {}
                        }
                    }
                }
                Event::End(ref e) => {
                    let tag = e.name();
                    match tag.as_ref() {
                        b"prefix" => {
                            if let Some(p) = pending.take() {
                                let factor = p.scale_value.ok_or_else(|| {
                                    EssenceError::Structure(format!(
                                        "prefix '{}' has no numeric value",
                                        p.code
                                    ))
                                })?;
                                prefixes.push(Prefix {
                                    code: p.code,
                                    name: p.names.first().cloned().unwrap_or_default(),
                                    factor,
                                });
                            }
                        }
                        b"base-unit" => {
                            if let Some(p) = pending.take() {
                                units.insert(
                                    p.code.clone(),
                                    UnitDef {
                                        code: p.code,
                                        names: p.names,
                                        property: p.property,
                                        metric: true,
                                        special: false,
                                        base: true,
                                        scale: None,
                                    },
                                );
                            }
                        }
                        b"unit" => {
                            if let Some(p) = pending.take() {
                                catalog.push(UnitCatalogEntry {
                                    code: p.code.clone(),
                                    names: p.names.clone(),
                                });
                                let scale = match (p.scale_unit, p.scale_value) {
                                    (Some(unit), Some(value)) => Some((unit, value)),
                                    _ => None,
                                };
                                units.insert(
                                    p.code.clone(),
                                    UnitDef {
                                        code: p.code,
                                        names: p.names,
                                        property: p.property,
                                        metric: p.metric,
                                        special: p.special,
                                        base: false,
                                        scale,
                                    },
                                );
                            }
                        }
                        _ => {}
                    }
                    curr.clear();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if units.is_empty() {
            return Err(EssenceError::Structure(
                "no unit definitions found".to_string(),
            ));
        }

        Ok(Self {
            catalog,
            units,
            prefixes,
        })
    }

    /// Resolve an atomic code: exact unit, or metric prefix + metric unit.
    /// Returns the definition, the prefix scale factor, and the prefix if any.
    fn lookup(&self, code: &str) -> Option<(&UnitDef, f64, Option<&Prefix>)> {
        if let Some(def) = self.units.get(code) {
            return Some((def, 1.0, None));
        }
        for prefix in &self.prefixes {
            if let Some(rest) = code.strip_prefix(prefix.code.as_str()) {
                if rest.is_empty() {
                    continue;
                }
                if let Some(def) = self.units.get(rest) {
                    if def.metric {
                        return Some((def, prefix.factor, Some(prefix)));
                    }
                }
            }
        }
        None
    }

    fn unresolved(&self, original: &str, code: &str) -> SemanticError {
        if code.contains(['/', '.']) {
            SemanticError::UnsupportedExpression(original.to_string())
        } else {
            SemanticError::UnknownCode(original.to_string())
        }
    }

    /// Walk scale links down to a base unit: `(factor, base_code)`.
    fn base_factor(&self, original: &str) -> Result<(f64, String), SemanticError> {
        let mut factor = 1.0;
        let mut code = original.trim().to_string();

        // Definition chains in the essence file are shallow; the bound only
        // guards against cyclic definitions.
        for _ in 0..32 {
            let (def, prefix_factor, _) = self
                .lookup(&code)
                .ok_or_else(|| self.unresolved(original, &code))?;
            if def.special {
                return Err(SemanticError::NotProportional(original.to_string()));
            }
            factor *= prefix_factor;
            if def.base {
                return Ok((factor, def.code.clone()));
            }
            match &def.scale {
                Some((next, value)) => {
                    factor *= value;
                    code = next.clone();
                }
                None => return Err(SemanticError::NotProportional(original.to_string())),
            }
        }
        Err(SemanticError::MalformedDefinitions(format!(
            "cyclic unit definition reached from '{original}'"
        )))
    }
}

impl UnitSemanticsEngine for EssenceEngine {
    fn catalog(&self) -> &[UnitCatalogEntry] {
        &self.catalog
    }

    fn analyse(&self, code: &str) -> Result<String, SemanticError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(SemanticError::UnknownCode(trimmed.to_string()));
        }
        match self.lookup(trimmed) {
            Some((def, _, Some(prefix))) => Ok(format!(
                "{}{} ({})",
                prefix.name,
                def.display_names(),
                def.property
            )),
            Some((def, _, None)) => {
                Ok(format!("{} ({})", def.display_names(), def.property))
            }
            None => Err(self.unresolved(trimmed, trimmed)),
        }
    }

    fn convert(
        &self,
        value: &str,
        source: &str,
        destination: &str,
    ) -> Result<f64, SemanticError> {
        let numeric: f64 = value
            .trim()
            .parse()
            .map_err(|_| SemanticError::InvalidValue(value.trim().to_string()))?;
        let (source_factor, source_base) = self.base_factor(source)?;
        let (destination_factor, destination_base) = self.base_factor(destination)?;
        if source_base != destination_base {
            return Err(SemanticError::Incommensurable {
                src: source.trim().to_string(),
                destination: destination.trim().to_string(),
            });
        }
        Ok(numeric * source_factor / destination_factor)
    }
}
