//! Vertex formats shared by the shape recipes.

use bytemuck::{Pod, Zeroable};

use crate::gfx::{InputElement, VertexFormat};
use crate::render::color::Rgba8;

/// A vertex type with a fixed input layout. Element `i` feeds shader location `i`.
pub trait Vertex: Pod {
    const ELEMENTS: &'static [InputElement];
}

// ── color ─────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub pos: [f32; 3],
    pub color: Rgba8,
}

impl ColorVertex {
    pub const fn new(pos: [f32; 3], color: Rgba8) -> Self {
        Self { pos, color }
    }
}

impl Vertex for ColorVertex {
    const ELEMENTS: &'static [InputElement] = &[
        InputElement { semantic: "Position", format: VertexFormat::Float32x3, offset: 0 },
        InputElement { semantic: "Color", format: VertexFormat::Unorm8x4, offset: 12 },
    ];
}

// ── textured ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub pos: [f32; 3],
    pub color: Rgba8,
    pub uv: [f32; 2],
}

impl TexturedVertex {
    pub const fn new(pos: [f32; 3], color: Rgba8, uv: [f32; 2]) -> Self {
        Self { pos, color, uv }
    }
}

impl Vertex for TexturedVertex {
    const ELEMENTS: &'static [InputElement] = &[
        InputElement { semantic: "Position", format: VertexFormat::Float32x3, offset: 0 },
        InputElement { semantic: "Color", format: VertexFormat::Unorm8x4, offset: 12 },
        InputElement { semantic: "TexCoord", format: VertexFormat::Float32x2, offset: 16 },
    ];
}

// ── lit ───────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct NormalVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for NormalVertex {
    const ELEMENTS: &'static [InputElement] = &[
        InputElement { semantic: "Position", format: VertexFormat::Float32x3, offset: 0 },
        InputElement { semantic: "Normal", format: VertexFormat::Float32x3, offset: 12 },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covers_stride<V: Vertex>() {
        let end = V::ELEMENTS
            .iter()
            .map(|e| e.offset + e.format.size())
            .max()
            .unwrap();
        assert_eq!(end as usize, std::mem::size_of::<V>());
    }

    #[test]
    fn elements_cover_each_vertex_exactly() {
        covers_stride::<ColorVertex>();
        covers_stride::<TexturedVertex>();
        covers_stride::<NormalVertex>();
    }

    #[test]
    fn strides() {
        assert_eq!(std::mem::size_of::<ColorVertex>(), 16);
        assert_eq!(std::mem::size_of::<TexturedVertex>(), 24);
        assert_eq!(std::mem::size_of::<NormalVertex>(), 24);
    }
}
