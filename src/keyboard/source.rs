//! Keyboard source abstraction and scoped acquisition

use super::{Drain, EventBuffer, KeyTransition};
use crate::error::DeviceError;
use std::ops::{Deref, DerefMut};

/// A device that buffers key transitions until drained.
pub trait KeyboardSource {
    /// Short backend name for status display
    fn name(&self) -> &'static str;

    /// Gain background, non-exclusive access to the keyboard
    fn acquire(&mut self) -> Result<(), DeviceError>;

    /// Append up to `max` buffered transitions to `out` in arrival order.
    ///
    /// Lost events are reported through the returned status, never as an
    /// error. Must not block.
    fn drain(&mut self, out: &mut Vec<KeyTransition>, max: usize) -> Result<Drain, DeviceError>;

    /// Give the keyboard back. Safe to call more than once.
    fn release(&mut self);
}

impl<S: KeyboardSource + ?Sized> KeyboardSource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn acquire(&mut self) -> Result<(), DeviceError> {
        (**self).acquire()
    }

    fn drain(&mut self, out: &mut Vec<KeyTransition>, max: usize) -> Result<Drain, DeviceError> {
        (**self).drain(out, max)
    }

    fn release(&mut self) {
        (**self).release()
    }
}

impl<S: KeyboardSource + ?Sized> KeyboardSource for &mut S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn acquire(&mut self) -> Result<(), DeviceError> {
        (**self).acquire()
    }

    fn drain(&mut self, out: &mut Vec<KeyTransition>, max: usize) -> Result<Drain, DeviceError> {
        (**self).drain(out, max)
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// An acquired keyboard that is released when dropped
pub struct AcquiredKeyboard<S: KeyboardSource> {
    source: S,
}

impl<S: KeyboardSource> AcquiredKeyboard<S> {
    pub fn acquire(mut source: S) -> Result<Self, DeviceError> {
        source.acquire()?;
        log::info!("Acquired keyboard via {}", source.name());
        Ok(Self { source })
    }
}

impl<S: KeyboardSource> Deref for AcquiredKeyboard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.source
    }
}

impl<S: KeyboardSource> DerefMut for AcquiredKeyboard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: KeyboardSource> Drop for AcquiredKeyboard<S> {
    fn drop(&mut self) {
        self.source.release();
        log::info!("Released keyboard ({})", self.source.name());
    }
}

/// Scripted source that replays transitions fed to it.
///
/// Fed events go through the same bounded buffer as a real device, so
/// feeding more than the capacity between drains produces an overflow.
pub struct ReplaySource {
    buffer: EventBuffer,
    acquired: bool,
    released: bool,
    pending_error: Option<DeviceError>,
}

impl ReplaySource {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: EventBuffer::new(capacity),
            acquired: false,
            released: false,
            pending_error: None,
        }
    }

    /// Queue transitions as if they arrived from the device
    pub fn feed(&mut self, events: &[KeyTransition]) {
        for event in events {
            self.buffer.push(*event);
        }
    }

    /// Make the next drain fail with `err`
    pub fn fail_next_drain(&mut self, err: DeviceError) {
        self.pending_error = Some(err);
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    /// Whether release has been called since the last acquire
    pub fn was_released(&self) -> bool {
        self.released
    }
}

impl KeyboardSource for ReplaySource {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn acquire(&mut self) -> Result<(), DeviceError> {
        self.acquired = true;
        self.released = false;
        Ok(())
    }

    fn drain(&mut self, out: &mut Vec<KeyTransition>, max: usize) -> Result<Drain, DeviceError> {
        if !self.acquired {
            return Err(DeviceError::NotAcquired(self.name()));
        }
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }
        Ok(self.buffer.drain(out, max))
    }

    fn release(&mut self) {
        self.acquired = false;
        self.released = true;
        self.buffer.clear();
    }
}
