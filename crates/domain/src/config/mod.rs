mod attributes;
mod logging;
mod transport;

pub use attributes::*;
pub use logging::*;
pub use transport::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Attribute name → wire code.
    #[serde(default = "d_attribute_codes")]
    pub attributes: AttributeCodes,
    #[serde(default)]
    pub custom_attributes: Vec<CustomAttributeConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attributes: d_attribute_codes(),
            custom_attributes: Vec::new(),
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Like [`load`](Self::load), but falls back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// All `(name, code)` pairs: the `[attributes]` table followed by the
    /// custom attributes.
    pub fn all_codes(&self) -> impl Iterator<Item = (&str, i64)> {
        self.attributes
            .iter()
            .map(|(name, code)| (name.as_str(), *code))
            .chain(
                self.custom_attributes
                    .iter()
                    .map(|c| (c.name.as_str(), c.code)),
            )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.  Encoding names of
    /// custom attributes are checked when the catalog is built.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (name, code) in &self.attributes {
            check_entry(&mut errors, &format!("attributes.{name}"), name, *code);
        }

        for (i, custom) in self.custom_attributes.iter().enumerate() {
            let field = format!("custom_attributes[{i}]");
            check_entry(&mut errors, &field, &custom.name, custom.code);

            if is_builtin_attribute(&custom.name) {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Warning,
                    field: format!("{field}.name"),
                    message: format!(
                        "'{}' is a built-in attribute; its encoder will be replaced",
                        custom.name
                    ),
                });
            }
            if self.attributes.contains_key(&custom.name) {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Warning,
                    field: format!("{field}.name"),
                    message: format!(
                        "'{}' is also listed in [attributes]; the custom code wins",
                        custom.name
                    ),
                });
            }
        }

        // The host decodes by code, so two names sharing one is ambiguous.
        let mut seen: HashMap<i64, &str> = HashMap::new();
        for (name, code) in self.all_codes() {
            if let Some(first) = seen.insert(code, name) {
                if first != name {
                    errors.push(ConfigError {
                        severity: ConfigSeverity::Error,
                        field: format!("attributes.{name}"),
                        message: format!("code {code} is already used by '{first}'"),
                    });
                }
            }
        }

        if self.all_codes().next().is_none() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "attributes".into(),
                message: "no attributes registered; every notification will fail".into(),
            });
        }

        errors
    }
}

fn check_entry(errors: &mut Vec<ConfigError>, field: &str, name: &str, code: i64) {
    if name.is_empty() {
        errors.push(ConfigError {
            severity: ConfigSeverity::Error,
            field: field.to_string(),
            message: "attribute name must not be empty".into(),
        });
    }
    if code < 0 || code > i64::from(u32::MAX) {
        errors.push(ConfigError {
            severity: ConfigSeverity::Error,
            field: field.to_string(),
            message: format!("code {code} is outside 0..={}", u32::MAX),
        });
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn negative_code_is_an_error() {
        let mut config = Config::default();
        config.attributes.insert("Broken".into(), -3);
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ConfigSeverity::Error);
        assert_eq!(issues[0].field, "attributes.Broken");
    }

    #[test]
    fn duplicate_code_is_an_error() {
        let mut config = Config::default();
        config.custom_attributes.push(CustomAttributeConfig {
            name: "Title".into(),
            code: 3,
            encoding: "pass_through".into(),
        });
        let issues = config.validate();
        assert!(issues
            .iter()
            .any(|e| e.severity == ConfigSeverity::Error && e.message.contains("'Text'")));
    }

    #[test]
    fn shadowing_builtin_is_a_warning() {
        let mut config = Config::default();
        config.attributes.remove("Url");
        config.custom_attributes.push(CustomAttributeConfig {
            name: "Url".into(),
            code: 40,
            encoding: "list_join".into(),
        });
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ConfigSeverity::Warning);
    }

    #[test]
    fn empty_table_warns() {
        let config = Config {
            attributes: AttributeCodes::new(),
            ..Config::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ConfigSeverity::Warning);
    }

    #[test]
    fn display_includes_severity_tag() {
        let err = ConfigError {
            severity: ConfigSeverity::Warning,
            field: "attributes".into(),
            message: "empty".into(),
        };
        assert_eq!(err.to_string(), "[WARN] attributes: empty");
    }
}
