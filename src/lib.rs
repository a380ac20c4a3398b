//! Hotkey Stopwatch - terminal stopwatch with global keyboard shortcuts
//!
//! Ctrl+F12 toggles the stopwatch and Ctrl+Shift+F12 resets it, even while
//! another window has focus. The elapsed time is shown in the terminal
//! title.

pub mod config;
pub mod duration;
pub mod error;
pub mod keyboard;
pub mod shortcuts;
pub mod stopwatch;
pub mod ui;

pub use config::Config;
pub use error::{ConfigError, DeviceError};
