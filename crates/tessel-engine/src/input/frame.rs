use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// What changed since the last frame.
///
/// The runtime clears it after every `on_frame`; held state lives in
/// [`InputState`](super::InputState).
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
    /// Logical pixels.
    pub pointer_delta: (f32, f32),
    /// Positive scrolls away from the user.
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
