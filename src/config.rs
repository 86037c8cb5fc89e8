//! Property-file configuration
//!
//! Location precedence:
//! 1. Explicit path: `--config` / `UCUMCHECK_CONFIG`
//! 2. Local file: `./ucumcheck.toml`
//! 3. Global file: `$XDG_CONFIG_HOME/ucumcheck/ucumcheck.toml`
//!
//! The snapshot is loaded once in `main` and passed by reference afterwards.
//! Property names mirror the historical dotted keys (`ucum.essence.path`,
//! `conversion.source.unit`, ...) as nested TOML tables.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Configuration and argument resolution errors. All map to exit code 1.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required property '{0}' is missing from the configuration")]
    MissingProperty(&'static str),

    #[error("invalid argument count: {count} (expected {expected})")]
    InvalidArgumentCount { count: usize, expected: &'static str },

    #[error("both codeValidation and codeConversion are disabled; enable at least one")]
    NoModeEnabled,

    #[error("configuration source error: {message}")]
    Source { message: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EssenceSettings {
    /// Default path to ucum-essence.xml (`ucum.essence.path`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultCodeSettings {
    /// Default candidate code for validation (`ucum.default.code`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UcumSettings {
    pub essence: EssenceSettings,
    pub default: DefaultCodeSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UnitRefSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConversionSettings {
    /// Default value to convert (`conversion.value`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Default source unit (`conversion.source.unit`)
    pub source: UnitRefSettings,
    /// Default destination unit (`conversion.destination.unit`)
    pub destination: UnitRefSettings,
}

/// Process-wide configuration snapshot, read-only after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Enable the validation mode (`codeValidation`)
    #[serde(rename = "codeValidation")]
    pub code_validation: bool,

    /// Enable the conversion mode (`codeConversion`)
    #[serde(rename = "codeConversion")]
    pub code_conversion: bool,

    pub ucum: UcumSettings,
    pub conversion: ConversionSettings,
}

/// Blank property values count as absent, matching the historical behavior.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Path to the local property file, if present.
fn local_config_path() -> Option<PathBuf> {
    let local = PathBuf::from("ucumcheck.toml");
    local.is_file().then_some(local)
}

/// Path to the global property file, if present.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ucumcheck")
        .map(|dirs| dirs.config_dir().join("ucumcheck.toml"))
        .filter(|p| p.is_file())
}

impl Settings {
    /// Load the property snapshot.
    ///
    /// An explicit path must exist; without one the local then global default
    /// locations are probed, and if neither exists the compiled defaults are
    /// used (both mode toggles off).
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.is_file() {
                    return Err(ConfigError::Source {
                        message: format!("property file not found: {}", p.display()),
                    });
                }
                Some(p.to_path_buf())
            }
            None => local_config_path().or_else(global_config_path),
        };

        let Some(path) = path else {
            debug!("no property file found, using compiled defaults");
            return Ok(Self::default());
        };
        debug!("loading properties from {:?}", path);

        let content = std::fs::read_to_string(&path).map_err(|e| source_err(&path, e))?;
        let mut settings: Self = toml::from_str(&content).map_err(|e| source_err(&path, e))?;
        settings.expand_paths();
        Ok(settings)
    }

    /// Expand `~` and `$VAR` in the essence path.
    fn expand_paths(&mut self) {
        if let Some(p) = &self.ucum.essence.path {
            match shellexpand::full(p) {
                Ok(expanded) => self.ucum.essence.path = Some(expanded.into_owned()),
                Err(e) => debug!("cannot expand essence path {:?}: {}", p, e),
            }
        }
    }

    pub fn essence_path(&self) -> Option<&str> {
        non_blank(&self.ucum.essence.path)
    }

    pub fn default_code(&self) -> Option<&str> {
        non_blank(&self.ucum.default.code)
    }

    pub fn conversion_value(&self) -> Option<&str> {
        non_blank(&self.conversion.value)
    }

    pub fn source_unit(&self) -> Option<&str> {
        non_blank(&self.conversion.source.unit)
    }

    pub fn destination_unit(&self) -> Option<&str> {
        non_blank(&self.conversion.destination.unit)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Source {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template property file.
    pub fn template() -> String {
        r#"# ucumcheck configuration
#
# Location precedence:
#   Explicit: --config FILE or UCUMCHECK_CONFIG
#   Local:    ./ucumcheck.toml
#   Global:   ~/.config/ucumcheck/ucumcheck.toml

# Enable validation of a UCUM code
codeValidation = true

# Enable conversion of a value between units
codeConversion = false

[ucum.essence]
# Default path to the UCUM definition file
path = "~/ucum/ucum-essence.xml"

[ucum.default]
# Default candidate code when no arguments are given
code = "mg"

[conversion]
# Default value to convert
value = "10"

[conversion.source]
unit = "kg"

[conversion.destination]
unit = "[lb_av]"
"#
        .to_string()
    }
}

fn source_err(path: &Path, e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Source {
        message: format!("{}: {}", path.display(), e),
    }
}
