//! Elapsed-time bookkeeping
//!
//! Time only advances on [`Stopwatch::tick`]. Toggling off keeps whatever
//! the last tick accumulated; the partial interval since that tick is not
//! added.

use crate::duration::FormattedDuration;
use std::time::Instant;

/// Whether the stopwatch is counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    accumulated_secs: f64,
    /// Set only while running
    last_resume: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StopwatchState {
        if self.last_resume.is_some() {
            StopwatchState::Running
        } else {
            StopwatchState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == StopwatchState::Running
    }

    pub fn accumulated_secs(&self) -> f64 {
        self.accumulated_secs
    }

    /// Flip between running and stopped
    pub fn toggle(&mut self, now: Instant) {
        self.last_resume = match self.last_resume {
            Some(_) => None,
            None => Some(now),
        };
    }

    /// Stop and zero the stopwatch
    pub fn reset(&mut self) {
        self.last_resume = None;
        self.accumulated_secs = 0.0;
    }

    /// Fold the time since the last resume or tick into the total
    pub fn tick(&mut self, now: Instant) {
        if let Some(last) = self.last_resume {
            self.accumulated_secs += now.saturating_duration_since(last).as_secs_f64();
            self.last_resume = Some(now);
        }
    }

    pub fn formatted(&self) -> FormattedDuration {
        FormattedDuration::from_secs_f64(self.accumulated_secs)
    }

    /// Title text: bare time while running, wrapped while stopped
    pub fn caption(&self) -> String {
        crate::duration::caption(&self.formatted(), self.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_stopped_at_zero() {
        let sw = Stopwatch::new();
        assert_eq!(sw.state(), StopwatchState::Stopped);
        assert_eq!(sw.accumulated_secs(), 0.0);
        assert_eq!(sw.caption(), "Timer (0:00:00)");
    }

    #[test]
    fn toggle_flips_and_double_toggle_restores() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();

        sw.toggle(t0);
        assert!(sw.is_running());
        sw.toggle(t0 + ms(100));
        assert!(!sw.is_running());
        assert_eq!(sw.accumulated_secs(), 0.0);
    }

    #[test]
    fn toggle_does_not_touch_accumulated() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        sw.toggle(t0);
        sw.tick(t0 + ms(1500));
        let before = sw.accumulated_secs();

        sw.toggle(t0 + ms(1700));
        assert_eq!(sw.accumulated_secs(), before);
        sw.toggle(t0 + ms(1900));
        assert_eq!(sw.accumulated_secs(), before);
    }

    #[test]
    fn ticks_sum_inter_tick_deltas() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        sw.toggle(t0);

        let mut expected = 0.0;
        let mut last = t0;
        for step in [250u64, 260, 240, 1000, 5] {
            let now = last + ms(step);
            sw.tick(now);
            expected += ms(step).as_secs_f64();
            last = now;
        }

        assert!((sw.accumulated_secs() - expected).abs() < 1e-9);
    }

    #[test]
    fn stopped_ticks_are_frozen() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        sw.toggle(t0);
        sw.tick(t0 + ms(500));
        sw.toggle(t0 + ms(600));

        sw.tick(t0 + ms(5_000));
        sw.tick(t0 + ms(10_000));
        assert_eq!(sw.accumulated_secs(), 0.5);
    }

    #[test]
    fn resume_measures_from_toggle_instant() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        sw.toggle(t0);
        sw.tick(t0 + ms(1000));
        sw.toggle(t0 + ms(1000));

        // Time while stopped is not counted
        sw.toggle(t0 + ms(60_000));
        sw.tick(t0 + ms(61_000));
        assert_eq!(sw.accumulated_secs(), 2.0);
    }

    #[test]
    fn reset_from_any_state() {
        let t0 = Instant::now();

        let mut running = Stopwatch::new();
        running.toggle(t0);
        running.tick(t0 + ms(3000));
        running.reset();
        assert_eq!(running.state(), StopwatchState::Stopped);
        assert_eq!(running.accumulated_secs(), 0.0);

        let mut stopped = Stopwatch::new();
        stopped.reset();
        assert_eq!(stopped.state(), StopwatchState::Stopped);
        assert_eq!(stopped.accumulated_secs(), 0.0);
    }

    #[test]
    fn caption_wraps_only_while_stopped() {
        let t0 = Instant::now();
        let mut sw = Stopwatch::new();
        sw.toggle(t0);
        sw.tick(t0 + ms(61_000));
        assert_eq!(sw.caption(), "0:01:01");

        sw.toggle(t0 + ms(61_100));
        assert_eq!(sw.caption(), "Timer (0:01:01)");
    }
}
