//! Keyboard and mouse state for the demo controls.
//!
//! The runtime turns winit events into [`InputEvent`]s; nothing here exposes
//! winit types.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, MouseButton};
