//! Widget configuration.
//!
//! The host hands the widget a flat set of string options. Names may carry
//! the module prefix (`sl.api_key`), and an empty value means "not set".

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::format::DepartureFilter;

/// Default look-ahead for the departure board, in minutes.
pub const DEFAULT_TIME_WINDOW: u32 = 15;

/// Prefix the host puts in front of this module's option names.
const MODULE_PREFIX: &str = "sl.";

/// Errors building a [`WidgetConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required option {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?} is not {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("malformed parameter {0:?}, expected name=value")]
    MalformedParameter(String),

    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {message}", .path.display())]
    Format { path: PathBuf, message: String },
}

/// Raw option values as the host supplies them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetParameters(BTreeMap<String, String>);

impl WidgetParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one option. A leading `sl.` is dropped from the name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.trim();
        let name = name.strip_prefix(MODULE_PREFIX).unwrap_or(name);
        self.0.insert(name.to_string(), value.into());
    }

    /// Set one option from a `name=value` assignment.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<(), ConfigError> {
        match assignment.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                self.set(name, value.trim());
                Ok(())
            }
            _ => Err(ConfigError::MalformedParameter(assignment.to_string())),
        }
    }

    /// Load options from a JSON object of strings or numbers.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let format_error = |message: String| ConfigError::Format {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = serde_json::from_str(&contents).map_err(|e| format_error(e.to_string()))?;
        let Value::Object(options) = value else {
            return Err(format_error("expected a JSON object".to_string()));
        };

        let mut params = Self::new();
        for (name, value) in options {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Null => String::new(),
                other => {
                    return Err(format_error(format!(
                        "option {name} must be a string or number, got {other}"
                    )));
                }
            };
            params.set(&name, value);
        }
        Ok(params)
    }

    /// Overlay `other` on top of these options.
    pub fn merge(&mut self, other: WidgetParameters) {
        self.0.extend(other.0);
    }

    /// Value of an option, `None` if absent or empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Immutable widget settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub api_key: String,
    pub site_id: String,
    /// Look-ahead in minutes.
    pub time_window: u32,
    pub filter: DepartureFilter,
}

impl WidgetConfig {
    pub fn from_parameters(params: &WidgetParameters) -> Result<Self, ConfigError> {
        let api_key = params.get("api_key").ok_or(ConfigError::Missing("api_key"))?;
        let site_id = params.get("site_id").ok_or(ConfigError::Missing("site_id"))?;

        let time_window = match params.get("time_window") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "time_window",
                value: value.to_string(),
                expected: "a whole number of minutes",
            })?,
            None => DEFAULT_TIME_WINDOW,
        };

        let journey_direction = params
            .get("journey_direction")
            .map(|value| {
                value.parse().map_err(|_| ConfigError::Invalid {
                    name: "journey_direction",
                    value: value.to_string(),
                    expected: "an integer",
                })
            })
            .transpose()?;

        Ok(Self {
            api_key: api_key.to_string(),
            site_id: site_id.to_string(),
            time_window,
            filter: DepartureFilter {
                line_number: params.get("line_number").map(str::to_string),
                journey_direction,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn params(pairs: &[(&str, &str)]) -> WidgetParameters {
        let mut params = WidgetParameters::new();
        for (name, value) in pairs {
            params.set(name, *value);
        }
        params
    }

    #[test]
    fn defaults() {
        let config =
            WidgetConfig::from_parameters(&params(&[("api_key", "KEY"), ("site_id", "9263")]))
                .unwrap();

        assert_eq!(config.api_key, "KEY");
        assert_eq!(config.site_id, "9263");
        assert_eq!(config.time_window, DEFAULT_TIME_WINDOW);
        assert_eq!(config.filter, DepartureFilter::none());
    }

    #[test]
    fn full_configuration_with_prefix() {
        let config = WidgetConfig::from_parameters(&params(&[
            ("sl.api_key", "KEY"),
            ("sl.site_id", "9263"),
            ("sl.time_window", "30"),
            ("sl.line_number", "51"),
            ("sl.journey_direction", "2"),
        ]))
        .unwrap();

        assert_eq!(config.time_window, 30);
        assert_eq!(config.filter, DepartureFilter::line_and_direction("51", 2));
    }

    #[test]
    fn empty_values_are_unset() {
        let config = WidgetConfig::from_parameters(&params(&[
            ("api_key", "KEY"),
            ("site_id", "9263"),
            ("time_window", ""),
            ("line_number", ""),
            ("journey_direction", ""),
        ]))
        .unwrap();

        assert_eq!(config.time_window, DEFAULT_TIME_WINDOW);
        assert_eq!(config.filter, DepartureFilter::none());

        let err = WidgetConfig::from_parameters(&params(&[("api_key", ""), ("site_id", "1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("api_key")));
    }

    #[test]
    fn missing_site_id() {
        let err = WidgetConfig::from_parameters(&params(&[("api_key", "KEY")])).unwrap_err();
        assert_eq!(err.to_string(), "missing required option site_id");
    }

    #[test]
    fn invalid_numbers() {
        let err = WidgetConfig::from_parameters(&params(&[
            ("api_key", "KEY"),
            ("site_id", "9263"),
            ("time_window", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for time_window: \"soon\" is not a whole number of minutes"
        );

        let err = WidgetConfig::from_parameters(&params(&[
            ("api_key", "KEY"),
            ("site_id", "9263"),
            ("journey_direction", "north"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "journey_direction",
                ..
            }
        ));
    }

    #[test]
    fn assignments() {
        let mut params = WidgetParameters::new();
        params.set_assignment("sl.line_number=51").unwrap();
        params.set_assignment("site_id = 9263").unwrap();
        assert_eq!(params.get("line_number"), Some("51"));
        assert_eq!(params.get("site_id"), Some("9263"));

        assert!(matches!(
            params.set_assignment("no-equals-sign"),
            Err(ConfigError::MalformedParameter(_))
        ));
        assert!(params.set_assignment("=value").is_err());
    }

    #[test]
    fn load_file_and_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sl.json");
        std::fs::write(
            &path,
            r#"{"sl.api_key": "KEY", "site_id": "9263", "time_window": 20, "line_number": "4"}"#,
        )
        .unwrap();

        let mut params = WidgetParameters::load(&path).unwrap();
        let mut overrides = WidgetParameters::new();
        overrides.set_assignment("line_number=51").unwrap();
        params.merge(overrides);

        let config = WidgetConfig::from_parameters(&params).unwrap();
        assert_eq!(config.api_key, "KEY");
        assert_eq!(config.time_window, 20);
        assert_eq!(config.filter, DepartureFilter::line("51"));
    }

    #[test]
    fn load_rejects_non_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sl.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = WidgetParameters::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Format { .. }));
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn load_missing_file() {
        let err = WidgetParameters::load("/nonexistent/sl.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
