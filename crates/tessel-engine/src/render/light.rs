//! Single point light: a pixel-stage constant buffer plus a sphere marker.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::gfx::ResourceId;

use super::bindable::ConstantBuffer;
use super::context::Graphics;
use super::drawable::{Drawable, Instance, Motion};
use super::error::RenderError;
use super::shapes::{Shape, SolidSphere};

/// Pixel-stage slot the Phong shader reads the light from.
pub const LIGHT_SLOT: u32 = 0;

const POSITION_LIMIT: f32 = 100.0;

/// Tunable light parameters. Colors are linear RGB in 0..1.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightParams {
    pub position: Vec3,
    pub material: Vec3,
    pub ambient: Vec3,
    pub diffuse_color: Vec3,
    pub diffuse_intensity: f32,
    pub att_const: f32,
    pub att_lin: f32,
    pub att_quad: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            material: Vec3::new(0.93, 0.87, 0.31),
            ambient: Vec3::splat(0.07),
            diffuse_color: Vec3::ONE,
            diffuse_intensity: 2.0,
            att_const: 1.0,
            att_lin: 0.045,
            att_quad: 0.0075,
        }
    }
}

/// GPU layout of [`LightParams`]; every vec3 starts on a 16-byte boundary.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub material: [f32; 3],
    pub _pad1: f32,
    pub ambient: [f32; 3],
    pub _pad2: f32,
    pub diffuse_color: [f32; 3],
    pub diffuse_intensity: f32,
    pub att_const: f32,
    pub att_lin: f32,
    pub att_quad: f32,
    pub _pad3: f32,
}

impl From<&LightParams> for LightUniform {
    fn from(p: &LightParams) -> Self {
        Self {
            position: p.position.to_array(),
            _pad0: 0.0,
            material: p.material.to_array(),
            _pad1: 0.0,
            ambient: p.ambient.to_array(),
            _pad2: 0.0,
            diffuse_color: p.diffuse_color.to_array(),
            diffuse_intensity: p.diffuse_intensity,
            att_const: p.att_const,
            att_lin: p.att_lin,
            att_quad: p.att_quad,
            _pad3: 0.0,
        }
    }
}

pub struct PointLight {
    pub params: LightParams,
    buffer: ConstantBuffer<LightUniform>,
    marker: Instance,
}

impl PointLight {
    /// `radius` sizes the marker sphere.
    pub fn new(gfx: &mut Graphics, radius: f32) -> Result<Self, RenderError> {
        let params = LightParams::default();
        let buffer = ConstantBuffer::pixel(gfx.device(), LIGHT_SLOT, &LightUniform::from(&params))?;
        let marker = SolidSphere::new(radius).spawn(gfx, Motion::at_rest())?;
        Ok(Self {
            params,
            buffer,
            marker,
        })
    }

    /// Upload the current parameters and bind them for the draws that follow.
    pub fn bind(&self, gfx: &mut Graphics) -> Result<(), RenderError> {
        let device = gfx.device();
        self.buffer.update(device, &LightUniform::from(&self.params))?;
        self.buffer.apply(device)?;
        Ok(())
    }

    /// Draw the marker at the light position.
    pub fn draw(&mut self, gfx: &mut Graphics) -> Result<(), RenderError> {
        self.marker.motion_mut().set_position(self.params.position);
        self.marker.draw(gfx)
    }

    /// Move the light, keeping each coordinate within ±100.
    pub fn translate(&mut self, delta: Vec3) {
        let limit = Vec3::splat(POSITION_LIMIT);
        self.params.position = (self.params.position + delta).clamp(-limit, limit);
    }

    pub fn reset(&mut self) {
        self.params = LightParams::default();
    }

    /// Release the constant buffer. The marker's resources belong to the
    /// shared registry and cache.
    pub fn release(self, gfx: &mut Graphics) -> Result<(), RenderError> {
        gfx.device().release(ResourceId::from(self.buffer.slot().id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Call, HeadlessDevice, ShaderStage};
    use crate::render::context::GraphicsConfig;
    use std::mem::offset_of;

    fn graphics() -> (Graphics, crate::gfx::CallLog) {
        let dev = HeadlessDevice::new();
        let log = dev.log();
        (Graphics::new(Box::new(dev), GraphicsConfig::default()), log)
    }

    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 80);
        assert_eq!(offset_of!(LightUniform, material), 16);
        assert_eq!(offset_of!(LightUniform, ambient), 32);
        assert_eq!(offset_of!(LightUniform, diffuse_color), 48);
        assert_eq!(offset_of!(LightUniform, diffuse_intensity), 60);
        assert_eq!(offset_of!(LightUniform, att_const), 64);
        assert_eq!(offset_of!(LightUniform, att_quad), 72);
    }

    #[test]
    fn bind_uploads_to_pixel_slot() {
        let (mut gfx, log) = graphics();
        let mut light = PointLight::new(&mut gfx, 0.5).unwrap();
        light.params.diffuse_intensity = 4.0;
        log.clear();

        light.bind(&mut gfx).unwrap();
        let id = light.buffer.slot().id;
        assert_eq!(
            log.calls(),
            vec![
                Call::WriteBuffer { id, size: 80 },
                Call::SetConstantBuffer { stage: ShaderStage::Pixel, slot: LIGHT_SLOT, id },
            ]
        );
    }

    #[test]
    fn marker_follows_position() {
        let (mut gfx, _) = graphics();
        let mut light = PointLight::new(&mut gfx, 0.5).unwrap();
        light.translate(Vec3::new(3.0, 4.0, 500.0));
        assert_eq!(light.params.position, Vec3::new(3.0, 4.0, 100.0));
        light.draw(&mut gfx).unwrap();
        let at = light.marker.transform().transform_point3(Vec3::ZERO);
        assert!((at - light.params.position).length() < 1e-4);
    }

    #[test]
    fn reset_restores_defaults() {
        let (mut gfx, _) = graphics();
        let mut light = PointLight::new(&mut gfx, 0.5).unwrap();
        light.params.ambient = Vec3::ONE;
        light.translate(Vec3::X);
        light.reset();
        assert_eq!(light.params, LightParams::default());
    }
}
