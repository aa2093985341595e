//! TOML configuration for the robokit binary.
//!
//! Reads and writes `RobokitConfig` at the platform-appropriate path:
//! - Windows:  `%APPDATA%\Robokit\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/robokit/config.toml` (or `~/.config/robokit`)
//! - macOS:    `~/Library/Application Support/Robokit/config.toml`
//!
//! ```toml
//! [general]
//! log_level = "info"
//!
//! [input]
//! mouse_delay_ms = 10
//! key_delay_ms = 10
//!
//! [typing]
//! micro_delay_ms = 7.0
//! strategy = "auto"
//!
//! [smooth]
//! low = 1.0
//! high = 3.0
//! step_delay_ms = 10
//! ```
//!
//! Every field has a `#[serde(default = ...)]`, so a partial file (or none
//! at all) still loads.

use std::path::{Path, PathBuf};

use robokit_core::domain::mouse::{DEFAULT_SMOOTH_HIGH, DEFAULT_SMOOTH_LOW};
use robokit_core::unicode::DEFAULT_MICRO_DELAY_MS;
use robokit_core::{SmoothMoveSpec, TextStrategy, DEFAULT_DELAY_MS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::robot::InputSettings;

/// Failure to locate, read or write the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory for this platform")]
    NoPlatformConfigDir,

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RobokitConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub typing: TypingConfig,
    #[serde(default)]
    pub smooth: SmoothConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Pauses applied after each mouse or key action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    #[serde(default = "default_delay_ms")]
    pub mouse_delay_ms: u32,
    #[serde(default = "default_delay_ms")]
    pub key_delay_ms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypingConfig {
    /// Pause after each escape token, milliseconds.
    #[serde(default = "default_micro_delay_ms")]
    pub micro_delay_ms: f64,
    #[serde(default)]
    pub strategy: StrategyChoice,
}

/// Text strategy as written in the file.  `auto` keeps the platform's choice.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrategyChoice {
    #[default]
    Auto,
    Escape,
    Direct,
}

/// Defaults for smooth moves that pass no explicit parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmoothConfig {
    #[serde(default = "default_smooth_low")]
    pub low: f64,
    #[serde(default = "default_smooth_high")]
    pub high: f64,
    #[serde(default = "default_delay_ms")]
    pub step_delay_ms: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_delay_ms() -> u32 {
    DEFAULT_DELAY_MS
}
fn default_micro_delay_ms() -> f64 {
    DEFAULT_MICRO_DELAY_MS
}
fn default_smooth_low() -> f64 {
    DEFAULT_SMOOTH_LOW
}
fn default_smooth_high() -> f64 {
    DEFAULT_SMOOTH_HIGH
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_delay_ms: default_delay_ms(),
            key_delay_ms: default_delay_ms(),
        }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            micro_delay_ms: default_micro_delay_ms(),
            strategy: StrategyChoice::Auto,
        }
    }
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            low: default_smooth_low(),
            high: default_smooth_high(),
            step_delay_ms: default_delay_ms(),
        }
    }
}

// ── Conversions into application settings ─────────────────────────────────────

impl From<&InputConfig> for InputSettings {
    fn from(cfg: &InputConfig) -> Self {
        Self {
            mouse_delay_ms: cfg.mouse_delay_ms,
            key_delay_ms: cfg.key_delay_ms,
        }
    }
}

impl From<&SmoothConfig> for SmoothMoveSpec {
    fn from(cfg: &SmoothConfig) -> Self {
        Self {
            low: cfg.low,
            high: cfg.high,
            step_delay_ms: cfg.step_delay_ms,
        }
    }
}

impl StrategyChoice {
    /// The forced strategy, or `None` for `auto`.
    pub fn strategy(self) -> Option<TextStrategy> {
        match self {
            Self::Auto => None,
            Self::Escape => Some(TextStrategy::Escape),
            Self::Direct => Some(TextStrategy::Direct),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Directory holding `config.toml` on this platform.
///
/// # Errors
///
/// [`ConfigError::NoPlatformConfigDir`] when neither the platform variable
/// nor `HOME` is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// # Errors
///
/// See [`config_dir`].
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from the platform path; defaults if the file is absent.
///
/// # Errors
///
/// See [`load_config_from`].
pub fn load_config() -> Result<RobokitConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config from `path`, returning `RobokitConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<RobokitConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RobokitConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to the platform path.
///
/// # Errors
///
/// See [`save_config_to`].
pub fn save_config(config: &RobokitConfig) -> Result<(), ConfigError> {
    save_config_to(&config_file_path()?, config)
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &RobokitConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory, including the `Robokit` component.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Robokit"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("robokit"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("Robokit")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
