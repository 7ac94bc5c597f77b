//! Microdata configuration.
//!
//! Read from the `[microdata]` table of a TOML file:
//!
//! ```toml
//! [microdata]
//! vocabulary = "https://schema.org/"
//! default_tag = "section"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::directive::is_tag_name;

/// Settings shared by the `itemscope` directive.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MicrodataConfig {
    /// Base URI prefixed to `itemscope` type names.
    pub vocabulary: String,
    /// Tag used when the directive has no `tag` option.
    pub default_tag: String,
}

impl Default for MicrodataConfig {
    fn default() -> Self {
        Self {
            vocabulary: "http://data-vocabulary.org/".to_owned(),
            default_tag: "div".to_owned(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    microdata: MicrodataConfig,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl MicrodataConfig {
    /// Load the `[microdata]` table from a TOML file.
    ///
    /// A file without the table yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, malformed, or
    /// fails [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), vocabulary = %config.vocabulary, "Loaded microdata config");
        Ok(config)
    }

    /// Parse the `[microdata]` table from TOML source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is malformed or fails validation.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        file.microdata.validate()?;
        Ok(file.microdata)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the vocabulary is empty or not
    /// an http(s) URL, or the default tag is not a tag name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.vocabulary, "microdata.vocabulary")?;
        require_http_url(&self.vocabulary, "microdata.vocabulary")?;
        require_non_empty(&self.default_tag, "microdata.default_tag")?;
        if !is_tag_name(&self.default_tag) {
            return Err(ConfigError::Validation(format!(
                "microdata.default_tag `{}` is not a valid tag name",
                self.default_tag
            )));
        }
        Ok(())
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = MicrodataConfig::default();
        assert_eq!(config.vocabulary, "http://data-vocabulary.org/");
        assert_eq!(config.default_tag, "div");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let config = MicrodataConfig::from_toml("[server]\nport = 8080\n").unwrap();
        assert_eq!(config, MicrodataConfig::default());
    }

    #[test]
    fn test_parse_table() {
        let toml = r#"
[microdata]
vocabulary = "https://schema.org/"
default_tag = "section"
"#;
        let config = MicrodataConfig::from_toml(toml).unwrap();
        assert_eq!(config.vocabulary, "https://schema.org/");
        assert_eq!(config.default_tag, "section");
    }

    #[test]
    fn test_partial_table() {
        let config =
            MicrodataConfig::from_toml("[microdata]\nvocabulary = \"https://schema.org/\"\n")
                .unwrap();
        assert_eq!(config.default_tag, "div");
    }

    #[test]
    fn test_rejects_non_http_vocabulary() {
        let err = MicrodataConfig::from_toml("[microdata]\nvocabulary = \"schema.org/\"\n")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: microdata.vocabulary must start with http:// or https://"
        );
    }

    #[test]
    fn test_rejects_empty_values() {
        let err = MicrodataConfig::from_toml("[microdata]\nvocabulary = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("cannot be empty")));

        let err = MicrodataConfig::from_toml("[microdata]\ndefault_tag = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_bad_tag() {
        let err =
            MicrodataConfig::from_toml("[microdata]\ndefault_tag = \"di v\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("di v")));
    }

    #[test]
    fn test_parse_error() {
        let err = MicrodataConfig::from_toml("[microdata\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("rw.toml");
        std::fs::write(&path, "[microdata]\nvocabulary = \"https://schema.org/\"\n").unwrap();

        let config = MicrodataConfig::load(&path).unwrap();
        assert_eq!(config.vocabulary, "https://schema.org/");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = MicrodataConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(ref p) if *p == path));
    }
}
