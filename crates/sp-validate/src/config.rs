//! Validator configuration

use serde::{Deserialize, Serialize};
use sp_rules::CronPrecheck;

/// Validator configuration
///
/// Loadable from TOML:
///
/// ```toml
/// name_field = "name"
/// max_depth = 32
///
/// [cron_precheck]
/// min_len = 5
/// min_tokens = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Pseudo-path of the free-standing name field
    pub name_field: String,
    /// Deepest nesting level that is descended into; a value tree nested
    /// deeper gets a `validation_rule` finding at the cut-off path
    pub max_depth: usize,
    /// Cheap cron pre-check thresholds
    pub cron_precheck: CronPrecheck,
}

impl ValidatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With name field path
    #[inline]
    #[must_use]
    pub fn with_name_field(mut self, name_field: impl Into<String>) -> Self {
        self.name_field = name_field.into();
        self
    }

    /// With maximum nesting depth
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// With cron pre-check thresholds
    #[inline]
    #[must_use]
    pub fn with_cron_precheck(mut self, precheck: CronPrecheck) -> Self {
        self.cron_precheck = precheck;
        self
    }

    /// Parse from TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML for this shape.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize to TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            name_field: "name".to_string(),
            max_depth: 32,
            cron_precheck: CronPrecheck::default(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid TOML document
    #[error("invalid TOML: {0}")]
    InvalidToml(#[from] toml::de::Error),

    /// Serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ValidatorConfig::from_toml("max_depth = 4\n[cron_precheck]\nmin_tokens = 5\n").unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.name_field, "name");
        assert_eq!(config.cron_precheck.min_tokens, 5);
        assert_eq!(config.cron_precheck.min_len, 5);
    }

    #[test]
    fn toml_roundtrip() {
        let config = ValidatorConfig::new().with_name_field("canvas.name").with_max_depth(8);
        let parsed = ValidatorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ValidatorConfig::from_toml("max_depth = \"deep\"").is_err());
    }
}
