//! Shared configuration loader for the yWriter conversion tools.
//!
//! `defaults/yw.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`YwConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/yw.default.toml");

/// Top-level configuration consumed by the conversion tools.
#[derive(Debug, Clone, Deserialize)]
pub struct YwConfig {
    pub locale: LocaleConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Fallback locale for projects without language and country codes.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    pub language: String,
    pub country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub keep_backup: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `warn` or `yw_babel=debug`.
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<YwConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<YwConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.locale.language, "en");
        assert_eq!(config.locale.country, "US");
        assert!(config.output.keep_backup);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.keep_backup", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.output.keep_backup);
    }

    #[test]
    fn user_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("ywcnv.toml");
        std::fs::write(&path, "[locale]\nlanguage = \"de\"\ncountry = \"DE\"\n").expect("write");
        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.locale.language, "de");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/nonexistent/ywcnv.toml").build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/ywcnv.toml")
            .build()
            .expect("config to build");
        assert!(config.output.keep_backup);
    }
}
