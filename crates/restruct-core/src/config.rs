//! Engine configuration
//!
//! Configuration is loaded from defaults or a JSON document. Every field has
//! a default, so a partial document only overrides what it names.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use anyhow::Context as _;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default output format of `toDateTime` and `currentDateTime`
pub const DEFAULT_DATETIME_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

/// Default timezone of `toDateTime` and `currentDateTime`
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Mapping engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Date format used when `toDateTime` names none (day.js-style tokens)
    pub datetime_format: String,

    /// IANA timezone used when `toDateTime` names none
    pub timezone: String,

    /// Run the schema validator before every mapping
    pub validate_schema: bool,

    /// Upper bound on the number of contexts one mapping may expand to
    pub max_contexts: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            validate_schema: false,
            max_contexts: None,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.check()?;
        Ok(config)
    }

    /// Default timezone as a parsed zone
    pub fn default_tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| Error::Configuration {
            message: format!("Unknown timezone \"{}\": {}", self.timezone, e),
            source: None,
        })
    }

    fn check(&self) -> Result<()> {
        self.default_tz()?;
        if self.datetime_format.is_empty() {
            return Err(Error::Configuration {
                message: "datetime_format must not be empty".to_string(),
                source: None,
            });
        }
        if self.max_contexts == Some(0) {
            return Err(Error::Configuration {
                message: "max_contexts must be greater than zero".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.datetime_format, "YYYY-MM-DD HH:mm:ss");
        assert_eq!(config.timezone, "UTC");
        assert!(!config.validate_schema);
        assert_eq!(config.max_contexts, None);
        assert_eq!(config.default_tz().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"timezone": "Asia/Kolkata"}"#).unwrap();
        assert_eq!(config.timezone, "Asia/Kolkata");
        assert_eq!(config.datetime_format, DEFAULT_DATETIME_FORMAT);
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let err = EngineConfig::from_json_str(r#"{"timezone": "Mars/Olympus"}"#).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_zero_context_limit_rejected() {
        assert!(EngineConfig::from_json_str(r#"{"max_contexts": 0}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"validate_schema": true, "max_contexts": 100}}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(config.validate_schema);
        assert_eq!(config.max_contexts, Some(100));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        match err {
            Error::Configuration { message, source } => {
                assert!(message.contains("Failed to read config file"));
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
