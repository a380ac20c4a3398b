//! Keyboard event sources and transition buffering

mod buffer;
mod event;
pub mod keymap;
mod listener;
mod source;

#[cfg(target_os = "linux")]
mod evdev_listener;

pub use buffer::{Drain, DrainStatus, EventBuffer};
pub use event::{Key, KeyTransition};
pub use listener::{diff_snapshots, DeviceQueryListener};
pub use source::{AcquiredKeyboard, KeyboardSource, ReplaySource};

#[cfg(target_os = "linux")]
pub use evdev_listener::{is_evdev_available, EvdevListener};

use crate::config::{InputBackend, InputConfig};
use crate::error::DeviceError;

/// Build the keyboard source selected by the input config.
///
/// `Auto` prefers evdev on Linux when keyboards are visible and falls back
/// to device_query otherwise. The source is returned unacquired.
pub fn open_source(config: &InputConfig) -> Result<Box<dyn KeyboardSource>, DeviceError> {
    match config.backend {
        InputBackend::DeviceQuery => Ok(device_query_source(config)),
        InputBackend::Evdev => evdev_source(config.buffer_size),
        InputBackend::Auto => {
            #[cfg(target_os = "linux")]
            {
                if is_evdev_available() {
                    return evdev_source(config.buffer_size);
                }
                log::info!("No evdev keyboards visible, using device_query");
            }
            Ok(device_query_source(config))
        }
    }
}

/// Build and acquire the configured source.
///
/// Under `Auto`, an evdev source that fails to acquire (usually missing
/// permissions) is replaced by device_query.
pub fn acquire_source(
    config: &InputConfig,
) -> Result<AcquiredKeyboard<Box<dyn KeyboardSource>>, DeviceError> {
    let source = open_source(config)?;
    let may_fall_back = config.backend == InputBackend::Auto && source.name() != "device_query";

    match AcquiredKeyboard::acquire(source) {
        Ok(keyboard) => Ok(keyboard),
        Err(e) if may_fall_back => {
            log::warn!("Falling back to device_query: {}", e);
            AcquiredKeyboard::acquire(device_query_source(config))
        }
        Err(e) => Err(e),
    }
}

fn device_query_source(config: &InputConfig) -> Box<dyn KeyboardSource> {
    Box::new(DeviceQueryListener::new(
        config.buffer_size,
        config.sample_interval(),
    ))
}

#[cfg(target_os = "linux")]
fn evdev_source(capacity: usize) -> Result<Box<dyn KeyboardSource>, DeviceError> {
    Ok(Box::new(EvdevListener::new(capacity)))
}

#[cfg(not(target_os = "linux"))]
fn evdev_source(_capacity: usize) -> Result<Box<dyn KeyboardSource>, DeviceError> {
    Err(DeviceError::Unavailable("evdev"))
}
