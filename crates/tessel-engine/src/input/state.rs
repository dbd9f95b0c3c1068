use std::collections::HashSet;
use std::hash::Hash;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, MouseButton};

/// Held keys and buttons, pointer position and focus for the window.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,
    /// Logical pixels; `None` while the pointer is outside the window.
    pub pointer_pos: Option<(f32, f32)>,
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

/// Records an edge only when the held set actually changes, so OS repeats
/// never count as new presses.
fn track<T: Eq + Hash + Copy>(
    held: &mut HashSet<T>,
    pressed: &mut HashSet<T>,
    released: &mut HashSet<T>,
    item: T,
    state: ButtonState,
) {
    match state {
        ButtonState::Pressed if held.insert(item) => {
            pressed.insert(item);
        }
        ButtonState::Released if held.remove(&item) => {
            released.insert(item);
        }
        _ => {}
    }
}

impl InputState {
    /// Folds `ev` into the held state and records the frame's edges and motion.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Key { key, state, .. } => track(
                &mut self.keys_down,
                &mut frame.keys_pressed,
                &mut frame.keys_released,
                key,
                state,
            ),
            InputEvent::Button { button, state } => track(
                &mut self.buttons_down,
                &mut frame.buttons_pressed,
                &mut frame.buttons_released,
                button,
                state,
            ),
            InputEvent::PointerMoved { x, y } => {
                if let Some((px, py)) = self.pointer_pos.replace((x, y)) {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
            }
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::Wheel { lines } => frame.wheel_lines += lines,
            InputEvent::Focused(focused) => {
                self.focused = focused;
                // Releases that happen while unfocused are never delivered.
                if !focused {
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    fn fresh() -> (InputState, InputFrame) {
        (InputState::default(), InputFrame::default())
    }

    // ── keys ───────────────────────────────────────────────────────────────

    #[test]
    fn repeat_press_is_not_a_new_edge() {
        let (mut st, mut fr) = fresh();
        st.apply_event(&mut fr, key(Key::Space, ButtonState::Pressed));
        assert!(fr.pressed(Key::Space));
        fr.clear();
        st.apply_event(&mut fr, key(Key::Space, ButtonState::Pressed));
        assert!(st.key_down(Key::Space));
        assert!(!fr.pressed(Key::Space));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let (mut st, mut fr) = fresh();
        st.apply_event(&mut fr, key(Key::W, ButtonState::Released));
        assert!(fr.keys_released.is_empty());

        st.apply_event(&mut fr, key(Key::W, ButtonState::Pressed));
        st.apply_event(&mut fr, key(Key::W, ButtonState::Released));
        assert!(!st.key_down(Key::W));
        assert!(fr.keys_released.contains(&Key::W));
    }

    #[test]
    fn losing_focus_drops_held_input() {
        let (mut st, mut fr) = fresh();
        st.apply_event(&mut fr, key(Key::J, ButtonState::Pressed));
        st.apply_event(
            &mut fr,
            InputEvent::Button { button: MouseButton::Left, state: ButtonState::Pressed },
        );
        st.apply_event(&mut fr, InputEvent::Focused(false));
        assert!(!st.key_down(Key::J));
        assert!(!st.button_down(MouseButton::Left));
    }

    // ── pointer ────────────────────────────────────────────────────────────

    #[test]
    fn motion_and_wheel_accumulate_until_cleared() {
        let (mut st, mut fr) = fresh();
        st.apply_event(&mut fr, InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        st.apply_event(&mut fr, InputEvent::PointerMoved { x: 14.0, y: 7.0 });
        st.apply_event(&mut fr, InputEvent::PointerMoved { x: 15.0, y: 9.0 });
        st.apply_event(&mut fr, InputEvent::Wheel { lines: 1.0 });
        st.apply_event(&mut fr, InputEvent::Wheel { lines: 0.5 });
        assert_eq!(fr.pointer_delta, (5.0, -1.0));
        assert_eq!(fr.wheel_lines, 1.5);

        fr.clear();
        assert_eq!(fr.pointer_delta, (0.0, 0.0));
        assert_eq!(fr.wheel_lines, 0.0);
    }

    #[test]
    fn re_entering_pointer_has_no_delta() {
        let (mut st, mut fr) = fresh();
        st.apply_event(&mut fr, InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        st.apply_event(&mut fr, InputEvent::PointerLeft);
        st.apply_event(&mut fr, InputEvent::PointerMoved { x: 300.0, y: 300.0 });
        assert_eq!(fr.pointer_delta, (0.0, 0.0));
        assert_eq!(st.pointer_pos, Some((300.0, 300.0)));
    }
}
