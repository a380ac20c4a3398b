//! Terminal User Interface components

mod app;
pub mod theme;
mod widgets;

pub use app::{App, AppState, TickReport};
pub use theme::ThemeColors;
pub use widgets::*;
