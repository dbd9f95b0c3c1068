//! The contract between the window runtime and the application it hosts.
//!
//! The runtime owns the event loop, window and GPU; the application sees them
//! only through [`FrameCtx`] once per frame and through the [`App`] hooks.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
