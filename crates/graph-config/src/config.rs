//! Configuration types and loading.
//!
//! The main entry point is [`GraphConfig`], loaded with [`load_config`] and
//! saved with [`save_config`]. Every field has a serde default, so a partial
//! file (or no file at all) yields a complete configuration.

use std::fmt;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of environment overrides, e.g. `GRAPHM_OUTPUT__PRETTY=false`.
pub const ENV_PREFIX: &str = "GRAPHM_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to write config file: {0}")]
    WriteError(#[from] serde_yaml::Error),

    /// A layer could not be merged or extracted.
    #[error("failed to load configuration: {0}")]
    LoadError(#[from] Box<figment::Error>),

    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::LoadError(Box::new(err))
    }
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// When to colour terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Colour when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        })
    }
}

/// Output configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Indent JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,

    #[serde(default)]
    pub color: ColorChoice,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            color: ColorChoice::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Decoding configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    /// Reject payloads whose `@odata.type` names no registered type.
    #[serde(default, rename = "strict-discriminators")]
    pub strict_discriminators: bool,

    /// Type used for payloads without a discriminator.
    #[serde(default = "default_type", rename = "default-type")]
    pub default_type: String,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            strict_discriminators: false,
            default_type: default_type(),
        }
    }
}

fn default_type() -> String {
    "Entity".to_string()
}

/// Encoding configuration section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Emit only changed properties (PATCH bodies).
    #[serde(default, rename = "changed-only")]
    pub changed_only: bool,
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when neither `-v` nor `RUST_LOG` is given.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full tool configuration, corresponding to `.graphm.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub decode: DecodeConfig,

    #[serde(default)]
    pub encode: EncodeConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl GraphConfig {
    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "log.level".into(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }
        if self.decode.default_type.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "decode.default-type".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Renders the configuration as it would be saved.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Builds the layered provider: defaults, then the file, then environment.
pub fn figment(path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(GraphConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Yaml::file(path));
    }
    // GRAPHM_DECODE__STRICT_DISCRIMINATORS -> decode.strict-discriminators
    let env = Env::prefixed(ENV_PREFIX)
        .split("__")
        .map(|key| key.as_str().to_ascii_lowercase().replace('_', "-").into());
    figment.merge(env)
}

/// Loads and validates the configuration.
///
/// A missing file contributes nothing. An empty file is valid.
///
/// # Errors
///
/// Returns [`ConfigError::LoadError`] for malformed YAML or values of the
/// wrong type, and [`ConfigError::InvalidValue`] when validation fails.
pub fn load_config(path: Option<&Path>) -> Result<GraphConfig> {
    let config: GraphConfig = figment(path).extract()?;
    config.validate()?;
    Ok(config)
}

/// Writes the configuration as YAML, creating parent directories.
pub fn save_config(path: &Path, config: &GraphConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config.to_yaml()?)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
