use winit::window::{Window, WindowId};

use crate::device::{Gpu, RenderTarget, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// The window a frame is rendered into.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Everything [`App::on_frame`](super::App::on_frame) gets to work with.
///
/// `'a` spans one callback; `'w` is the window borrow inside `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires the next image, clears it, lets `draw` record into it and
    /// presents it.
    ///
    /// `draw` is not called when acquisition fails. A fatal surface error
    /// returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> AppControl
    where
        F: FnOnce(&mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                return if action == SurfaceErrorAction::Fatal {
                    AppControl::Exit
                } else {
                    AppControl::Continue
                };
            }
        };

        let depth = self.gpu.depth_view();
        frame.clear(clear, depth);
        draw(&mut frame.target(depth));

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
