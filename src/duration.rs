//! `H:MM:SS` formatting for elapsed seconds

use std::fmt;

/// Whole-second breakdown of an elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattedDuration {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
}

impl FormattedDuration {
    /// Round to the nearest second (halves round up) and split.
    ///
    /// Negative and NaN inputs clamp to zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        let total = (secs.max(0.0) + 0.5) as u64;
        Self {
            hours: total / 60 / 60,
            minutes: (total / 60 % 60) as u8,
            seconds: (total % 60) as u8,
        }
    }
}

impl fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Format elapsed seconds as `H:MM:SS`
pub fn format_duration(secs: f64) -> String {
    FormattedDuration::from_secs_f64(secs).to_string()
}

/// Compose the window caption for a formatted time
pub fn caption(formatted: &FormattedDuration, running: bool) -> String {
    if running {
        formatted.to_string()
    } else {
        format!("Timer ({})", formatted)
    }
}
