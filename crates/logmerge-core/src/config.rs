//! Configuration types for logmerge.
//!
//! [`Config::load`] layers, lowest priority first: the embedded defaults,
//! `~/.config/logmerge/config.toml` (or an explicit path), and `LOGMERGE_*`
//! environment variables such as `LOGMERGE_MERGE__PATTERN`.
//! [`Config::defaults`] returns the embedded defaults without touching the
//! filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigurationError;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[merge]
pattern    = ""
assume_utc = false

[output]
color    = true
theme    = "default"
progress = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/logmerge/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[merge]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeConfig {
    /// Header pattern used when none is given on the command line.
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub assume_utc: bool,
}

/// `[output]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_color")]
    pub color: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_color() -> bool { true }
fn default_theme() -> String { "default".to_string() }
fn default_progress() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            theme: default_theme(),
            progress: default_progress(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration.
    ///
    /// With `path` set the file must exist; otherwise the per-user file is
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path(), false),
        };
        tracing::debug!(path = %path.display(), required, "loading configuration");

        let cfg = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix("LOGMERGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logmerge")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
