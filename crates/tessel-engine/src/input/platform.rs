//! winit events to [`InputEvent`]s.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use super::{ButtonState, InputEvent, Key, MouseButton};

/// Logical pixels per wheel line for devices that report pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

const LETTERS: [(KeyCode, Key); 26] = [
    (KeyCode::KeyA, Key::A),
    (KeyCode::KeyB, Key::B),
    (KeyCode::KeyC, Key::C),
    (KeyCode::KeyD, Key::D),
    (KeyCode::KeyE, Key::E),
    (KeyCode::KeyF, Key::F),
    (KeyCode::KeyG, Key::G),
    (KeyCode::KeyH, Key::H),
    (KeyCode::KeyI, Key::I),
    (KeyCode::KeyJ, Key::J),
    (KeyCode::KeyK, Key::K),
    (KeyCode::KeyL, Key::L),
    (KeyCode::KeyM, Key::M),
    (KeyCode::KeyN, Key::N),
    (KeyCode::KeyO, Key::O),
    (KeyCode::KeyP, Key::P),
    (KeyCode::KeyQ, Key::Q),
    (KeyCode::KeyR, Key::R),
    (KeyCode::KeyS, Key::S),
    (KeyCode::KeyT, Key::T),
    (KeyCode::KeyU, Key::U),
    (KeyCode::KeyV, Key::V),
    (KeyCode::KeyW, Key::W),
    (KeyCode::KeyX, Key::X),
    (KeyCode::KeyY, Key::Y),
    (KeyCode::KeyZ, Key::Z),
];

fn button_state(state: ElementState) -> ButtonState {
    if state.is_pressed() {
        ButtonState::Pressed
    } else {
        ButtonState::Released
    }
}

fn logical(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let pos = pos.to_logical::<f64>(window.scale_factor());
    (pos.x as f32, pos.y as f32)
}

fn key(physical: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = physical else {
        return Key::Unknown(0);
    };
    if let Some(&(_, letter)) = LETTERS.iter().find(|(c, _)| *c == code) {
        return letter;
    }
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        other => Key::Unknown(other as u32),
    }
}

fn mouse_button(button: WinitButton) -> MouseButton {
    match button {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Back => MouseButton::Other(3),
        WinitButton::Forward => MouseButton::Other(4),
        WinitButton::Other(n) => MouseButton::Other(n),
    }
}

/// `None` for window events the input state does not track.
pub(crate) fn translate_window_event(window: &Window, event: &WindowEvent) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: key(event.physical_key),
            state: button_state(event.state),
            repeat: event.repeat,
        },
        WindowEvent::MouseInput { state, button, .. } => InputEvent::Button {
            button: mouse_button(*button),
            state: button_state(*state),
        },
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(window, *position);
            InputEvent::PointerMoved { x, y }
        }
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::MouseWheel { delta, .. } => InputEvent::Wheel {
            lines: match *delta {
                MouseScrollDelta::LineDelta(_, y) => y,
                MouseScrollDelta::PixelDelta(p) => logical(window, p).1 / PIXELS_PER_LINE,
            },
        },
        WindowEvent::Focused(focused) => InputEvent::Focused(*focused),
        _ => return None,
    };
    Some(ev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_keys_map_to_named_keys() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::ArrowUp)), Key::ArrowUp);
        assert_eq!(key(PhysicalKey::Code(KeyCode::PageDown)), Key::PageDown);
        assert_eq!(key(PhysicalKey::Code(KeyCode::NumpadEnter)), Key::Enter);
    }

    #[test]
    fn letters_come_from_the_table() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::KeyW)), Key::W);
        assert_eq!(key(PhysicalKey::Code(KeyCode::KeyJ)), Key::J);
        assert_eq!(key(PhysicalKey::Code(KeyCode::KeyZ)), Key::Z);
    }

    #[test]
    fn unnamed_keys_are_unknown() {
        assert!(matches!(key(PhysicalKey::Code(KeyCode::F13)), Key::Unknown(_)));
        assert!(matches!(key(PhysicalKey::Code(KeyCode::Digit1)), Key::Unknown(_)));
    }

    #[test]
    fn side_buttons_are_numbered() {
        assert_eq!(mouse_button(WinitButton::Back), MouseButton::Other(3));
        assert_eq!(mouse_button(WinitButton::Forward), MouseButton::Other(4));
    }
}
