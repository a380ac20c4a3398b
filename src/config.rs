//! Configuration management for Hotkey Stopwatch
//!
//! Settings are read from a platform-specific TOML file. A missing file
//! means defaults.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/hotkey-stopwatch/config.toml` |
//! | macOS | `~/Library/Application Support/hotkey-stopwatch/config.toml` |
//! | Windows | `%APPDATA%\hotkey-stopwatch\config.toml` |
//!
//! ## Example
//!
//! ```toml
//! [timer]
//! tick_interval_ms = 250
//! title = "Timer"
//!
//! [input]
//! backend = "auto"
//! buffer_size = 32
//! sample_interval_ms = 5
//!
//! [ui]
//! theme = "Dark"
//!
//! [logging]
//! level = "warn"
//! ```

pub use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "hotkey-stopwatch";

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join(APP_DIR);

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Default location of the log file
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("hotkey-stopwatch.log"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tick and caption settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Interval between ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Title shown before the first tick
    pub title: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 250,
            title: "Timer".to_string(),
        }
    }
}

/// Which keyboard backend to use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputBackend {
    /// evdev on Linux when available, device_query otherwise
    #[default]
    Auto,
    DeviceQuery,
    Evdev,
}

/// Keyboard source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub backend: InputBackend,
    /// Transitions buffered between ticks before overflow
    pub buffer_size: usize,
    /// device_query sampling interval in milliseconds
    pub sample_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            backend: InputBackend::Auto,
            buffer_size: 32,
            sample_interval_ms: 5,
        }
    }
}

impl InputConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
    /// Log file; defaults to the platform cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn log_path(&self) -> Option<PathBuf> {
        self.file.clone().or_else(default_log_path)
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load and validate configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the main loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timer.tick_interval_ms",
                reason: "must be greater than zero",
            });
        }
        if self.input.buffer_size == 0 {
            return Err(ConfigError::Invalid {
                field: "input.buffer_size",
                reason: "must be greater than zero",
            });
        }
        if self.input.sample_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "input.sample_interval_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Get the tick interval as Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms)
    }
}
