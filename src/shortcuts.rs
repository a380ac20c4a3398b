//! Modifier tracking and stopwatch chord detection
//!
//! | Chord            | Signal   |
//! |------------------|----------|
//! | Ctrl+F12         | Toggle   |
//! | Ctrl+Shift+F12   | Reset    |
//!
//! Either Ctrl and either Shift count. Only the F12 press fires; its
//! release and any F12 press without Ctrl held are ignored.

use crate::keyboard::{Key, KeyTransition};

/// Signal emitted when a chord completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Toggle,
    Reset,
}

impl Shortcut {
    pub fn name(&self) -> &'static str {
        match self {
            Shortcut::Toggle => "Ctrl+F12",
            Shortcut::Reset => "Ctrl+Shift+F12",
        }
    }
}

/// Live state of the left/right Ctrl and Shift keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub left_ctrl: bool,
    pub right_ctrl: bool,
    pub left_shift: bool,
    pub right_shift: bool,
}

impl ModifierState {
    pub fn ctrl_down(&self) -> bool {
        self.left_ctrl || self.right_ctrl
    }

    pub fn shift_down(&self) -> bool {
        self.left_shift || self.right_shift
    }

    /// Set the flag for `key` to `is_down`. Returns false for non-modifiers.
    fn set(&mut self, key: Key, is_down: bool) -> bool {
        let flag = match key {
            Key::LeftCtrl => &mut self.left_ctrl,
            Key::RightCtrl => &mut self.right_ctrl,
            Key::LeftShift => &mut self.left_shift,
            Key::RightShift => &mut self.right_shift,
            Key::F12 | Key::Other => return false,
        };
        *flag = is_down;
        true
    }
}

/// Consumes transitions in arrival order and reports completed chords
#[derive(Debug, Default)]
pub struct ShortcutTracker {
    modifiers: ModifierState,
}

impl ShortcutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    /// Apply one transition. Modifier state is last-write-wins per key.
    pub fn process(&mut self, event: KeyTransition) -> Option<Shortcut> {
        if self.modifiers.set(event.key, event.is_down) {
            return None;
        }

        match event.key {
            Key::F12 if event.is_down && self.modifiers.ctrl_down() => {
                if self.modifiers.shift_down() {
                    Some(Shortcut::Reset)
                } else {
                    Some(Shortcut::Toggle)
                }
            }
            _ => None,
        }
    }

    /// Apply a drained batch in order, collecting every signal it fires
    pub fn process_batch(&mut self, events: &[KeyTransition]) -> Vec<Shortcut> {
        events.iter().filter_map(|e| self.process(*e)).collect()
    }
}
