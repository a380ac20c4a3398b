//! Main application state and the per-tick handler

use crate::config::Config;
use crate::error::DeviceError;
use crate::keyboard::{DrainStatus, KeyTransition, KeyboardSource};
use crate::shortcuts::{Shortcut, ShortcutTracker};
use crate::stopwatch::{Stopwatch, StopwatchState};
use std::time::{Duration, Instant};

const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Transitions drained from the source
    pub drained: usize,
    /// The source lost events since the previous tick
    pub overflow: bool,
    /// Chords fired, in order
    pub shortcuts: Vec<Shortcut>,
}

/// Main application
pub struct App {
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    tracker: ShortcutTracker,
    stopwatch: Stopwatch,
    /// Reused drain buffer
    events: Vec<KeyTransition>,
    /// Total transitions drained
    pub total_events: u64,
    /// Ticks that reported lost events
    pub overflow_count: u64,
    /// Ticks handled
    pub tick_count: u64,
    /// Last status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let capacity = config.input.buffer_size;
        Self {
            state: AppState::Running,
            config,
            tracker: ShortcutTracker::new(),
            stopwatch: Stopwatch::new(),
            events: Vec::with_capacity(capacity),
            total_events: 0,
            overflow_count: 0,
            tick_count: 0,
            status_message: None,
            status_time: None,
        }
    }

    /// Drain the keyboard, apply any chords, then advance the stopwatch.
    ///
    /// Overflow is tolerated: the events that did arrive are applied and
    /// the tick completes. Any other device error is returned.
    pub fn on_tick<S>(&mut self, source: &mut S, now: Instant) -> Result<TickReport, DeviceError>
    where
        S: KeyboardSource + ?Sized,
    {
        self.events.clear();
        let drain = source.drain(&mut self.events, self.config.input.buffer_size)?;

        let overflow = drain.status == DrainStatus::Overflow;
        if overflow {
            self.overflow_count += 1;
            log::debug!("Keyboard buffer overflowed; {} events kept", drain.count);
        }

        let events = std::mem::take(&mut self.events);
        let shortcuts = self.handle_events(&events, now);
        self.events = events;

        self.stopwatch.tick(now);
        self.tick_count += 1;

        Ok(TickReport {
            drained: drain.count,
            overflow,
            shortcuts,
        })
    }

    /// Feed transitions through the tracker in order and apply each chord
    pub fn handle_events(&mut self, events: &[KeyTransition], now: Instant) -> Vec<Shortcut> {
        self.total_events += events.len() as u64;

        let shortcuts = self.tracker.process_batch(events);
        for shortcut in &shortcuts {
            log::info!("{} pressed", shortcut.name());
            self.apply(*shortcut, now);
        }
        shortcuts
    }

    /// Route a chord to the stopwatch
    pub fn apply(&mut self, shortcut: Shortcut, now: Instant) {
        match shortcut {
            Shortcut::Toggle => self.toggle(now),
            Shortcut::Reset => self.reset(),
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        self.stopwatch.toggle(now);
        let message = match self.stopwatch.state() {
            StopwatchState::Running => "Started",
            StopwatchState::Stopped => "Stopped",
        };
        self.set_status(message.to_string());
    }

    pub fn reset(&mut self) {
        self.stopwatch.reset();
        self.set_status("Reset".to_string());
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn tracker(&self) -> &ShortcutTracker {
        &self.tracker
    }

    /// Text for the terminal title
    pub fn caption(&self) -> String {
        self.stopwatch.caption()
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed() < STATUS_TIMEOUT => Some(msg),
            _ => None,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{Key, ReplaySource};

    fn acquired(capacity: usize) -> ReplaySource {
        let mut source = ReplaySource::new(capacity);
        source.acquire().expect("replay acquire");
        source
    }

    #[test]
    fn empty_tick_only_advances_time() {
        let mut app = App::default();
        let mut source = acquired(32);

        let report = app.on_tick(&mut source, Instant::now()).expect("tick");
        assert_eq!(report, TickReport::default());
        assert_eq!(app.tick_count, 1);
        assert_eq!(app.caption(), "Timer (0:00:00)");
    }

    #[test]
    fn chord_is_applied_before_the_tick_advances() {
        let mut app = App::default();
        let mut source = acquired(32);
        let t0 = Instant::now();

        source.feed(&[
            KeyTransition::down(Key::LeftCtrl),
            KeyTransition::down(Key::F12),
        ]);
        let report = app.on_tick(&mut source, t0).expect("tick");

        assert_eq!(report.shortcuts, vec![Shortcut::Toggle]);
        assert!(app.stopwatch().is_running());
        assert_eq!(app.stopwatch().accumulated_secs(), 0.0);
        assert_eq!(app.get_status(), Some("Started"));
    }

    #[test]
    fn fatal_drain_error_propagates() {
        let mut app = App::default();
        let mut source = acquired(32);
        source.fail_next_drain(DeviceError::NoDevices);

        assert!(app.on_tick(&mut source, Instant::now()).is_err());
        assert_eq!(app.tick_count, 0);
    }

    #[test]
    fn quit_sets_state() {
        let mut app = App::default();
        app.quit();
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn local_reset_matches_chord_reset() {
        let mut app = App::default();
        let t0 = Instant::now();
        app.toggle(t0);
        app.reset();
        assert!(!app.stopwatch().is_running());
        assert_eq!(app.get_status(), Some("Reset"));
    }
}
