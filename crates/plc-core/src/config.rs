//! Coordinator configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! namespace_owner_label = "user"
//! create_failure_policy = "keep"
//! max_name_length = 63
//! ```

use plc_model::{DEFAULT_MAX_NAME_LEN, MIN_NAME_LEN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What Create does when namespace provisioning fails after the insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateFailurePolicy {
    /// Leave the inserted record in place and report the failure
    #[default]
    Keep,
    /// Remove the inserted record before reporting the failure
    Compensate,
}

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Namespace label key that carries the owner's username
    pub namespace_owner_label: String,
    /// Handling of a failed namespace provision
    pub create_failure_policy: CreateFailurePolicy,
    /// Longest accepted project name
    pub max_name_length: usize,
}

impl CoordinatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With owner label key
    #[inline]
    #[must_use]
    pub fn with_owner_label(mut self, label: impl Into<String>) -> Self {
        self.namespace_owner_label = label.into();
        self
    }

    /// With create failure policy
    #[inline]
    #[must_use]
    pub fn with_create_failure_policy(mut self, policy: CreateFailurePolicy) -> Self {
        self.create_failure_policy = policy;
        self
    }

    /// With maximum name length
    #[inline]
    #[must_use]
    pub fn with_max_name_length(mut self, max: usize) -> Self {
        self.max_name_length = max;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed TOML, `ConfigError::Invalid` on
    /// out-of-range values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`CoordinatorConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// `ConfigError::Render` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace_owner_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "namespace_owner_label must not be empty".to_string(),
            ));
        }
        if self.max_name_length < MIN_NAME_LEN {
            return Err(ConfigError::Invalid(format!(
                "max_name_length must be at least {MIN_NAME_LEN}"
            )));
        }
        Ok(())
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            namespace_owner_label: "user".to_string(),
            create_failure_policy: CreateFailurePolicy::Keep,
            max_name_length: DEFAULT_MAX_NAME_LEN,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serialization failed
    #[error("render error: {0}")]
    Render(#[from] toml::ser::Error),

    /// Value out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = CoordinatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoordinatorConfig::default());
        assert_eq!(config.namespace_owner_label, "user");
        assert_eq!(config.create_failure_policy, CreateFailurePolicy::Keep);
    }

    #[test]
    fn parses_all_fields() {
        let config = CoordinatorConfig::from_toml_str(
            r#"
            namespace_owner_label = "owner"
            create_failure_policy = "compensate"
            max_name_length = 32
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            CoordinatorConfig::new()
                .with_owner_label("owner")
                .with_create_failure_policy(CreateFailurePolicy::Compensate)
                .with_max_name_length(32)
        );
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            CoordinatorConfig::from_toml_str("max_name_length = 1"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CoordinatorConfig::from_toml_str("namespace_owner_label = \" \""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CoordinatorConfig::from_toml_str("create_failure_policy = \"retry\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn renders_and_reloads() {
        let config = CoordinatorConfig::new().with_max_name_length(40);
        let rendered = config.to_toml_string().unwrap();
        assert_eq!(CoordinatorConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = CoordinatorConfig::load("/nonexistent/plc.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
