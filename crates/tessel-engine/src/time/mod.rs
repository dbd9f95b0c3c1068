//! Per-frame delta time for the animation step.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, MAX_DT, MIN_DT};
