//! Cross-platform keyboard source built on device_query
//!
//! device_query only exposes the set of keys held right now, so a sampler
//! thread polls it at a short interval and turns snapshot differences into
//! transitions. The sampler plays the role of the device driver: it fills
//! the bounded buffer, and the tick handler drains it.

use super::{Drain, EventBuffer, Key, KeyTransition, KeyboardSource};
use crate::error::DeviceError;
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Keyboard source that samples global key state with device_query
pub struct DeviceQueryListener {
    buffer: Arc<Mutex<EventBuffer>>,
    running: Arc<AtomicBool>,
    sampler: Option<JoinHandle<()>>,
    sample_interval: Duration,
}

impl DeviceQueryListener {
    pub fn new(capacity: usize, sample_interval: Duration) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(EventBuffer::new(capacity))),
            running: Arc::new(AtomicBool::new(false)),
            sampler: None,
            sample_interval,
        }
    }

    /// Sampler thread body. `ready` reports whether the display connection
    /// opened; the loop only runs if it did.
    fn sample_loop(
        buffer: Arc<Mutex<EventBuffer>>,
        running: Arc<AtomicBool>,
        interval: Duration,
        ready: mpsc::SyncSender<bool>,
    ) {
        // DeviceState is not Send, so it has to be opened on this thread
        let Some(device_state) = DeviceState::checked_new() else {
            let _ = ready.send(false);
            return;
        };
        if ready.send(true).is_err() {
            return;
        }

        // Keys already held at startup produce no transitions
        let mut last_keys = device_state.get_keys();

        while running.load(Ordering::Acquire) {
            thread::sleep(interval);

            let current_keys = device_state.get_keys();
            let transitions = diff_snapshots(&last_keys, &current_keys);
            if !transitions.is_empty() {
                match buffer.lock() {
                    Ok(mut buffer) => {
                        for transition in transitions {
                            buffer.push(transition);
                        }
                    }
                    Err(_) => break,
                }
            }
            last_keys = current_keys;
        }
    }
}

impl KeyboardSource for DeviceQueryListener {
    fn name(&self) -> &'static str {
        "device_query"
    }

    fn acquire(&mut self) -> Result<(), DeviceError> {
        if self.sampler.is_some() {
            return Ok(());
        }

        self.running.store(true, Ordering::Release);
        let buffer = Arc::clone(&self.buffer);
        let running = Arc::clone(&self.running);
        let interval = self.sample_interval;
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);

        let handle = thread::Builder::new()
            .name("keyboard-sampler".to_string())
            .spawn(move || Self::sample_loop(buffer, running, interval, ready_tx))
            .map_err(|e| DeviceError::Sampler(e.to_string()))?;

        if !ready_rx.recv().unwrap_or(false) {
            self.running.store(false, Ordering::Release);
            if handle.join().is_err() {
                log::warn!("Keyboard sampler panicked during startup");
            }
            log::warn!("device_query could not open a display connection");
            return Err(DeviceError::Unavailable("device_query"));
        }

        log::debug!("Keyboard sampler started ({:?} interval)", interval);
        self.sampler = Some(handle);
        Ok(())
    }

    fn drain(&mut self, out: &mut Vec<KeyTransition>, max: usize) -> Result<Drain, DeviceError> {
        match &self.sampler {
            None => return Err(DeviceError::NotAcquired(self.name())),
            Some(handle) if handle.is_finished() => {
                return Err(DeviceError::Sampler("sampler thread exited".to_string()));
            }
            Some(_) => {}
        }

        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| DeviceError::Sampler("event buffer lock poisoned".to_string()))?;
        Ok(buffer.drain(out, max))
    }

    fn release(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.sampler.take() {
            if handle.join().is_err() {
                log::warn!("Keyboard sampler panicked");
            }
        }
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }
}

impl Drop for DeviceQueryListener {
    fn drop(&mut self) {
        self.release();
    }
}

/// Turn two key-state snapshots into ordered transitions.
///
/// The true order of changes between two samples is unknown. Releases come
/// first, then modifier presses, then other presses, so a chord pressed
/// within one sample interval still reads as modifier-then-trigger.
pub fn diff_snapshots(previous: &[Keycode], current: &[Keycode]) -> Vec<KeyTransition> {
    let mut transitions = Vec::new();

    for key in previous {
        if !current.contains(key) {
            transitions.push(KeyTransition::up(Key::from(*key)));
        }
    }

    let pressed: Vec<Key> = current
        .iter()
        .filter(|key| !previous.contains(*key))
        .map(|key| Key::from(*key))
        .collect();

    transitions.extend(
        pressed
            .iter()
            .filter(|key| key.is_modifier())
            .map(|key| KeyTransition::down(*key)),
    );
    transitions.extend(
        pressed
            .iter()
            .filter(|key| !key.is_modifier())
            .map(|key| KeyTransition::down(*key)),
    );

    transitions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_snapshot_yields_nothing() {
        let keys = vec![Keycode::LControl, Keycode::A];
        assert!(diff_snapshots(&keys, &keys).is_empty());
    }

    #[test]
    fn chord_in_one_sample_orders_modifier_first() {
        let transitions = diff_snapshots(&[], &[Keycode::F12, Keycode::LControl]);
        assert_eq!(
            transitions,
            vec![
                KeyTransition::down(Key::LeftCtrl),
                KeyTransition::down(Key::F12),
            ]
        );
    }

    #[test]
    fn releases_come_before_presses() {
        let transitions = diff_snapshots(&[Keycode::RShift], &[Keycode::F12]);
        assert_eq!(
            transitions,
            vec![
                KeyTransition::up(Key::RightShift),
                KeyTransition::down(Key::F12),
            ]
        );
    }

    #[test]
    fn untracked_keys_still_produce_transitions() {
        let transitions = diff_snapshots(&[Keycode::A], &[Keycode::B]);
        assert_eq!(
            transitions,
            vec![KeyTransition::up(Key::Other), KeyTransition::down(Key::Other)]
        );
    }

    #[test]
    fn drain_before_acquire_fails() {
        let mut listener = DeviceQueryListener::new(32, Duration::from_millis(5));
        let mut out = Vec::new();
        assert!(matches!(
            listener.drain(&mut out, 32),
            Err(DeviceError::NotAcquired("device_query"))
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn acquire_without_display_fails_cleanly() {
        std::env::remove_var("DISPLAY");

        let mut listener = DeviceQueryListener::new(32, Duration::from_millis(5));
        assert!(matches!(
            listener.acquire(),
            Err(DeviceError::Unavailable("device_query"))
        ));
        assert!(listener.sampler.is_none());

        let mut out = Vec::new();
        assert!(matches!(
            listener.drain(&mut out, 32),
            Err(DeviceError::NotAcquired("device_query"))
        ));
    }
}
