use crate::render::color::Rgba8;
use crate::render::context::Graphics;
use crate::render::error::RenderError;

use super::{ColorVertex, Recipe, Shape};

const fn v(x: f32, y: f32, z: f32, color: Rgba8) -> ColorVertex {
    ColorVertex::new([x, y, z], color)
}

/// Unit quad facing -Z, yellow along the bottom edge and magenta along the top.
#[derive(Debug, Default, Copy, Clone)]
pub struct Plane;

impl Shape for Plane {
    type Vertex = ColorVertex;

    fn recipe(&self, _gfx: &mut Graphics) -> Result<Recipe<ColorVertex>, RenderError> {
        let vertices = vec![
            v(-1.0, -1.0, -1.0, Rgba8::YELLOW),
            v(1.0, -1.0, -1.0, Rgba8::YELLOW),
            v(-1.0, 1.0, -1.0, Rgba8::MAGENTA),
            v(1.0, 1.0, -1.0, Rgba8::MAGENTA),
        ];
        Ok(Recipe::colored("plane", vertices, vec![0, 2, 1, 2, 3, 1]))
    }
}

/// Cube spanning -1..1, red at the near face and green at the far face.
#[derive(Debug, Default, Copy, Clone)]
pub struct Cube;

impl Shape for Cube {
    type Vertex = ColorVertex;

    fn recipe(&self, _gfx: &mut Graphics) -> Result<Recipe<ColorVertex>, RenderError> {
        let vertices = vec![
            v(-1.0, -1.0, -1.0, Rgba8::RED),
            v(1.0, -1.0, -1.0, Rgba8::RED),
            v(-1.0, 1.0, -1.0, Rgba8::RED),
            v(1.0, 1.0, -1.0, Rgba8::RED),
            v(-1.0, -1.0, 1.0, Rgba8::GREEN),
            v(1.0, -1.0, 1.0, Rgba8::GREEN),
            v(-1.0, 1.0, 1.0, Rgba8::GREEN),
            v(1.0, 1.0, 1.0, Rgba8::GREEN),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1,  2, 3, 1,
            1, 3, 5,  3, 7, 5,
            2, 6, 3,  3, 6, 7,
            4, 5, 7,  4, 7, 6,
            0, 4, 2,  2, 4, 6,
            0, 1, 4,  1, 5, 4,
        ];
        Ok(Recipe::colored("cube", vertices, indices))
    }
}

/// Square base at z = -1 with a white apex at z = 2.
#[derive(Debug, Default, Copy, Clone)]
pub struct Pyramid;

impl Shape for Pyramid {
    type Vertex = ColorVertex;

    fn recipe(&self, _gfx: &mut Graphics) -> Result<Recipe<ColorVertex>, RenderError> {
        let vertices = vec![
            v(-1.0, -1.0, -1.0, Rgba8::BLACK),
            v(1.0, -1.0, -1.0, Rgba8::BLACK),
            v(-1.0, 1.0, -1.0, Rgba8::BLACK),
            v(1.0, 1.0, -1.0, Rgba8::BLACK),
            v(0.0, 0.0, 2.0, Rgba8::WHITE),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1,  2, 3, 1,
            0, 4, 2,  0, 1, 4,
            1, 3, 4,  3, 2, 4,
        ];
        Ok(Recipe::colored("pyramid", vertices, indices))
    }
}

/// Triangular prism, blue cap at z = -1 and cyan cap at z = 1.
#[derive(Debug, Default, Copy, Clone)]
pub struct Prism;

impl Shape for Prism {
    type Vertex = ColorVertex;

    fn recipe(&self, _gfx: &mut Graphics) -> Result<Recipe<ColorVertex>, RenderError> {
        let vertices = vec![
            v(-1.0, -1.0, -1.0, Rgba8::BLUE),
            v(1.0, -1.0, -1.0, Rgba8::BLUE),
            v(0.0, 1.0, -1.0, Rgba8::BLUE),
            v(-1.0, -1.0, 1.0, Rgba8::CYAN),
            v(1.0, -1.0, 1.0, Rgba8::CYAN),
            v(0.0, 1.0, 1.0, Rgba8::CYAN),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1,
            0, 1, 3,  1, 4, 3,
            1, 2, 4,  2, 5, 4,
            2, 0, 5,  0, 3, 5,
            3, 4, 5,
        ];
        Ok(Recipe::colored("prism", vertices, indices))
    }
}
