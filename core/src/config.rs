//! Parser configuration.
//!
//! Tunables for the type caster and the namespace builder. Every field has a
//! default, so a YAML file only needs to list what it overrides.
//!
//! # Example YAML
//!
//! ```yaml
//! list_separator: ";"
//! true_values:
//!   - "1"
//!   - "yes"
//!   - "on"
//! internal_prefix: "_"
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings shared by the caster, the resolver and the namespace builder.
///
/// # Examples
///
/// ```
/// use command_tree_core::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert_eq!(config.list_separator, ',');
/// assert!(config.is_true("YES"));
/// assert!(config.is_internal("_helper"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Separator used to split a single raw value into list items.
    pub list_separator: char,
    /// Strings (compared case-insensitively) that cast to `true`.
    pub true_values: Vec<String>,
    /// Names starting with this prefix are left out of the namespace tree.
    pub internal_prefix: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            list_separator: ',',
            true_values: ["1", "yes", "true", "t"]
                .into_iter()
                .map(String::from)
                .collect(),
            internal_prefix: "_".to_string(),
        }
    }
}

impl ParserConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written, or
    /// [`ConfigError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Returns `true` if `raw` is one of the configured true-strings.
    pub fn is_true(&self, raw: &str) -> bool {
        let lowered = raw.to_lowercase();
        self.true_values.iter().any(|v| v.to_lowercase() == lowered)
    }

    /// Returns `true` if `name` is reserved for internal use.
    pub fn is_internal(&self, name: &str) -> bool {
        !self.internal_prefix.is_empty() && name.starts_with(&self.internal_prefix)
    }
}
