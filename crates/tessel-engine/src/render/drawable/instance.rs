use glam::Mat4;

use crate::render::bindable::Bindable;
use crate::render::context::Graphics;
use crate::render::error::RenderError;

use super::{Bindings, Drawable, Motion, TypeKey};

/// One placed object of some drawable kind.
///
/// The instance list holds only the transform bindable; geometry, shaders and
/// materials come from the shared slot under `key`.
#[derive(Debug)]
pub struct Instance {
    key: TypeKey,
    motion: Motion,
    own: Bindings,
}

impl Instance {
    pub fn new(key: TypeKey, motion: Motion) -> Self {
        Self {
            key,
            motion,
            own: Bindings::with_transform(),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }

    /// Append an instance-level bindable, applied after the shared list.
    pub fn attach(&mut self, bindable: Bindable) -> Result<(), RenderError> {
        self.own.push(bindable)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.own
    }

    /// Release resources owned by attached bindables.
    pub fn release(self, gfx: &mut Graphics) -> Result<(), RenderError> {
        for id in self.own.iter().filter_map(|b| b.owned_resource()) {
            gfx.device().release(id)?;
        }
        Ok(())
    }
}

impl Drawable for Instance {
    fn update(&mut self, dt: f32) {
        self.motion.update(dt);
    }

    fn transform(&self) -> Mat4 {
        self.motion.transform()
    }

    fn draw(&self, gfx: &mut Graphics) -> Result<(), RenderError> {
        gfx.draw_bindings(Some(self.key), &self.own, self.transform())
    }

    fn release(self: Box<Self>, gfx: &mut Graphics) -> Result<(), RenderError> {
        Instance::release(*self, gfx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Call, HeadlessDevice};
    use crate::render::bindable::Texture;
    use crate::render::color::Rgba8;
    use crate::render::context::GraphicsConfig;
    use crate::render::image::Image;
    use crate::render::shapes::{Plane, Shape};

    #[test]
    fn attached_texture_is_released_with_the_instance() {
        let dev = HeadlessDevice::new();
        let log = dev.log();
        let mut gfx = Graphics::new(Box::new(dev), GraphicsConfig::default());
        let mut plane = Plane.spawn(&mut gfx, Motion::at_rest()).unwrap();
        let image = Image::filled(1, 1, Rgba8::WHITE);
        let texture = Texture::new(gfx.device(), "tint", &image).unwrap();
        let id = texture.id();
        plane.attach(Bindable::Texture(texture)).unwrap();
        plane.draw(&mut gfx).unwrap();

        plane.release(&mut gfx).unwrap();
        assert!(log.calls().contains(&Call::Release(id.into())));
        gfx.shutdown().unwrap();
        assert_eq!(log.count(Call::is_create), log.count(|c| matches!(c, Call::Release(_))));
    }
}
