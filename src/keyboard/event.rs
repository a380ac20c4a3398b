//! Key transition events

/// Keys the stopwatch cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    LeftCtrl,
    RightCtrl,
    LeftShift,
    RightShift,
    F12,
    /// Any key without a role in the shortcut chords
    Other,
}

impl Key {
    /// Whether this key is one of the four tracked modifiers
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::LeftCtrl | Key::RightCtrl | Key::LeftShift | Key::RightShift
        )
    }
}

/// A single up/down transition as delivered by a keyboard source.
///
/// Order within a drained batch is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTransition {
    /// The key that changed
    pub key: Key,
    /// True for a press, false for a release
    pub is_down: bool,
}

impl KeyTransition {
    pub fn new(key: Key, is_down: bool) -> Self {
        Self { key, is_down }
    }

    /// A key press
    pub fn down(key: Key) -> Self {
        Self::new(key, true)
    }

    /// A key release
    pub fn up(key: Key) -> Self {
        Self::new(key, false)
    }
}
