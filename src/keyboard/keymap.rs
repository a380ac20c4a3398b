//! Mapping from backend key identifiers to [`Key`]

use super::Key;

/// Linux evdev scancodes for the tracked keys
pub mod scancode {
    pub const LEFT_CTRL: u16 = 29;
    pub const LEFT_SHIFT: u16 = 42;
    pub const RIGHT_SHIFT: u16 = 54;
    pub const F12: u16 = 88;
    pub const RIGHT_CTRL: u16 = 97;
}

impl Key {
    /// Map a Linux evdev scancode
    pub fn from_scancode(code: u16) -> Self {
        match code {
            scancode::LEFT_CTRL => Key::LeftCtrl,
            scancode::RIGHT_CTRL => Key::RightCtrl,
            scancode::LEFT_SHIFT => Key::LeftShift,
            scancode::RIGHT_SHIFT => Key::RightShift,
            scancode::F12 => Key::F12,
            _ => Key::Other,
        }
    }
}

impl From<device_query::Keycode> for Key {
    fn from(keycode: device_query::Keycode) -> Self {
        use device_query::Keycode as DK;
        match keycode {
            DK::LControl => Key::LeftCtrl,
            DK::RControl => Key::RightCtrl,
            DK::LShift => Key::LeftShift,
            DK::RShift => Key::RightShift,
            DK::F12 => Key::F12,
            _ => Key::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use device_query::Keycode;

    #[test]
    fn scancodes_map_to_tracked_keys() {
        assert_eq!(Key::from_scancode(29), Key::LeftCtrl);
        assert_eq!(Key::from_scancode(97), Key::RightCtrl);
        assert_eq!(Key::from_scancode(42), Key::LeftShift);
        assert_eq!(Key::from_scancode(54), Key::RightShift);
        assert_eq!(Key::from_scancode(88), Key::F12);
        assert_eq!(Key::from_scancode(30), Key::Other);
        assert_eq!(Key::from_scancode(87), Key::Other); // F11
    }

    #[test]
    fn device_query_keycodes_map_to_tracked_keys() {
        assert_eq!(Key::from(Keycode::LControl), Key::LeftCtrl);
        assert_eq!(Key::from(Keycode::RControl), Key::RightCtrl);
        assert_eq!(Key::from(Keycode::LShift), Key::LeftShift);
        assert_eq!(Key::from(Keycode::RShift), Key::RightShift);
        assert_eq!(Key::from(Keycode::F12), Key::F12);
        assert_eq!(Key::from(Keycode::A), Key::Other);
    }
}
