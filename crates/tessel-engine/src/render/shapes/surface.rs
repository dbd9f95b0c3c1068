use crate::gfx::Topology;
use crate::render::bindable::{Bindable, Sampler, Texture};
use crate::render::color::Rgba8;
use crate::render::context::Graphics;
use crate::render::error::RenderError;
use crate::render::image::Image;

use super::{Recipe, Shape, TexturedVertex, TEXTURE_PS, TEXTURE_VS};

/// Image shown on every [`Surface`], relative to the asset root.
pub const SURFACE_IMAGE: &str = "images/logo.png";

/// Textured square of side 10. Texture and sampler live in the shared slot.
#[derive(Debug, Default, Copy, Clone)]
pub struct Surface;

impl Shape for Surface {
    type Vertex = TexturedVertex;

    fn recipe(&self, gfx: &mut Graphics) -> Result<Recipe<TexturedVertex>, RenderError> {
        let image = Image::from_file(gfx.asset_path(SURFACE_IMAGE))?;
        let texture = Texture::new(gfx.device(), SURFACE_IMAGE, &image)?;
        let sampler = Sampler::new(gfx.device())?;

        let w = Rgba8::WHITE;
        let vertices = vec![
            TexturedVertex::new([-5.0, -5.0, -5.0], w, [0.0, 0.0]),
            TexturedVertex::new([5.0, -5.0, -5.0], w, [0.0, 1.0]),
            TexturedVertex::new([-5.0, 5.0, -5.0], w, [1.0, 0.0]),
            TexturedVertex::new([5.0, 5.0, -5.0], w, [1.0, 1.0]),
        ];
        Ok(Recipe {
            label: "surface".into(),
            vertices,
            indices: vec![0, 2, 1, 2, 3, 1],
            vertex_shader: TEXTURE_VS,
            pixel_shader: TEXTURE_PS,
            topology: Topology::TriangleList,
            extras: vec![Bindable::Texture(texture), Bindable::Sampler(sampler)],
        })
    }
}
