//! Bounded transition buffer shared by the keyboard backends

use super::KeyTransition;
use std::collections::VecDeque;

/// Outcome of a drain beyond the delivered events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStatus {
    /// Every transition since the last drain was kept
    Ok,
    /// Transitions were lost because the buffer filled up
    Overflow,
}

/// Result of draining a keyboard source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drain {
    /// Number of events appended to the output
    pub count: usize,
    pub status: DrainStatus,
}

impl Drain {
    pub fn is_overflow(&self) -> bool {
        self.status == DrainStatus::Overflow
    }
}

/// Fixed-capacity FIFO of key transitions.
///
/// A push into a full buffer drops the new event and latches the overflow
/// flag. The flag is reported and cleared by the next [`EventBuffer::drain`].
#[derive(Debug)]
pub struct EventBuffer {
    events: VecDeque<KeyTransition>,
    capacity: usize,
    overflowed: bool,
}

impl EventBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    /// Append a transition. Returns false if it was dropped.
    pub fn push(&mut self, event: KeyTransition) -> bool {
        if self.events.len() >= self.capacity {
            self.overflowed = true;
            return false;
        }
        self.events.push_back(event);
        true
    }

    /// Record that events were lost upstream of this buffer
    pub fn mark_overflow(&mut self) {
        self.overflowed = true;
    }

    /// Move up to `max` events into `out`, oldest first
    pub fn drain(&mut self, out: &mut Vec<KeyTransition>, max: usize) -> Drain {
        let count = max.min(self.events.len());
        out.extend(self.events.drain(..count));

        let status = if self.overflowed {
            self.overflowed = false;
            DrainStatus::Overflow
        } else {
            DrainStatus::Ok
        };

        Drain { count, status }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.overflowed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Key;

    #[test]
    fn drain_preserves_arrival_order() {
        let mut buffer = EventBuffer::new(8);
        buffer.push(KeyTransition::down(Key::LeftCtrl));
        buffer.push(KeyTransition::down(Key::F12));
        buffer.push(KeyTransition::up(Key::F12));

        let mut out = Vec::new();
        let drain = buffer.drain(&mut out, 8);

        assert_eq!(drain.count, 3);
        assert_eq!(drain.status, DrainStatus::Ok);
        assert_eq!(
            out,
            vec![
                KeyTransition::down(Key::LeftCtrl),
                KeyTransition::down(Key::F12),
                KeyTransition::up(Key::F12),
            ]
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn full_buffer_drops_new_events_and_reports_overflow_once() {
        let mut buffer = EventBuffer::new(2);
        assert!(buffer.push(KeyTransition::down(Key::LeftCtrl)));
        assert!(buffer.push(KeyTransition::down(Key::F12)));
        assert!(!buffer.push(KeyTransition::up(Key::F12)));

        let mut out = Vec::new();
        let drain = buffer.drain(&mut out, 32);
        assert_eq!(drain.count, 2);
        assert!(drain.is_overflow());
        assert_eq!(out[1], KeyTransition::down(Key::F12));

        out.clear();
        let drain = buffer.drain(&mut out, 32);
        assert_eq!(drain.count, 0);
        assert_eq!(drain.status, DrainStatus::Ok);
    }

    #[test]
    fn drain_respects_max_count() {
        let mut buffer = EventBuffer::new(8);
        for _ in 0..5 {
            buffer.push(KeyTransition::down(Key::Other));
        }

        let mut out = Vec::new();
        let drain = buffer.drain(&mut out, 3);
        assert_eq!(drain.count, 3);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn upstream_overflow_is_reported() {
        let mut buffer = EventBuffer::new(4);
        buffer.mark_overflow();
        let mut out = Vec::new();
        assert!(buffer.drain(&mut out, 4).is_overflow());
    }
}
