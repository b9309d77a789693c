//! Configuration loading
//!
//! `defaults/lexbridge.default.toml` is embedded into the binary so the
//! documented defaults and the runtime behavior stay in sync. Callers layer
//! their own files and overrides on top through [`Loader`] before
//! deserializing into [`LexbridgeConfig`].

use crate::codec::LineEnding;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/lexbridge.default.toml");

/// Name of the optional per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = "lexbridge.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LexbridgeConfig {
    pub analyzer: AnalyzerConfig,
    pub export: ExportConfig,
}

/// Where the analyzer lives and how long it may run.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    pub executable: PathBuf,
    pub timeout_secs: u64,
}

impl AnalyzerConfig {
    /// `None` when the timeout is disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub line_ending: LineEnding,
}

/// Builds a [`LexbridgeConfig`] from layers, later layers winning.
///
/// The command line stacks them as: embedded defaults, `./lexbridge.toml`
/// when present, the `--config` file, then `--analyzer` and `--timeout`.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Only the embedded defaults.
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Loader {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Add a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), true)
    }

    /// Add a TOML file, skipped when absent.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), false)
    }

    /// Add [`LOCAL_CONFIG_FILE`] from the current directory, if there is one.
    pub fn with_local_file(self) -> Self {
        self.with_optional_file(LOCAL_CONFIG_FILE)
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Pin `analyzer.executable`. Relative paths are still resolved against
    /// the install directory, so callers pass an absolute path to mean
    /// something else.
    pub fn with_executable(self, executable: &Path) -> Result<Self, ConfigError> {
        self.set_override("analyzer.executable", executable.to_string_lossy().into_owned())
    }

    /// Pin `analyzer.timeout_secs`, `0` disabling the timeout.
    pub fn with_timeout_secs(self, secs: u64) -> Result<Self, ConfigError> {
        let secs = i64::try_from(secs).map_err(|e| ConfigError::Message(e.to_string()))?;
        self.set_override("analyzer.timeout_secs", secs)
    }

    /// Override any key, dotted as in the TOML tables (`export.line_ending`).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<LexbridgeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<LexbridgeConfig, ConfigError> {
    Loader::new().build()
}
