//! Tessel engine crate.
//!
//! Hosts a window and GPU (`window`, `device`, `core`), the device boundary
//! the renderer talks through (`gfx`), and the 3D scene renderer (`render`).

pub mod core;
pub mod device;
pub mod gfx;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
