//! Error types shared by the keyboard backends and configuration

use std::io;
use thiserror::Error;

/// Failure reported by a keyboard event source.
///
/// Every variant is fatal to the application. Buffer overflow is not an
/// error; it is reported through [`crate::keyboard::DrainStatus`].
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The requested backend cannot run here (wrong platform, no display)
    #[error("keyboard backend '{0}' is not available")]
    Unavailable(&'static str),
    /// No keyboard devices found
    #[error("no keyboard devices found")]
    NoDevices,
    /// Permission denied accessing device
    #[error("permission denied accessing {0}")]
    PermissionDenied(String),
    /// Reading from an acquired device failed
    #[error("failed to read keyboard events from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The background sampler could not be started or stopped
    #[error("keyboard sampler failed: {0}")]
    Sampler(String),
    /// Drain was called before acquire
    #[error("keyboard source '{0}' has not been acquired")]
    NotAcquired(&'static str),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A value is outside its allowed range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
