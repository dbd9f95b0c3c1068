/// Keys the engine names. Anything else arrives as `Unknown` with the
/// platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Shift,
    Control,
    Alt,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Edge of a key or mouse button.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Input fed into [`InputState`](super::InputState) by the runtime.
///
/// Positions are logical pixels; wheel motion is in lines.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: ButtonState,
        /// OS auto-repeat while held.
        repeat: bool,
    },
    Button {
        button: MouseButton,
        state: ButtonState,
    },
    PointerMoved {
        x: f32,
        y: f32,
    },
    PointerLeft,
    Wheel {
        lines: f32,
    },
    Focused(bool),
}
