use std::path::PathBuf;

use crate::gfx::Topology;
use crate::render::color::Rgba8;
use crate::render::context::Graphics;
use crate::render::drawable::{TypeKey, TypeRegistry};
use crate::render::error::RenderError;

use super::{ColorVertex, NormalVertex, Recipe, Shape, PHONG_PS, PHONG_VS};

/// Model every [`SolidSphere`] is built from, relative to the asset root.
pub const SPHERE_MODEL: &str = "models/sphere.obj";

/// First mesh of an imported file, scaled uniformly and lit with Phong shading.
///
/// Relative paths resolve against the asset root. Each (path, scale) pair is
/// its own drawable kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub path: PathBuf,
    pub scale: f32,
}

impl Mesh {
    pub fn new(path: impl Into<PathBuf>, scale: f32) -> Self {
        Self {
            path: path.into(),
            scale,
        }
    }
}

impl Shape for Mesh {
    type Vertex = NormalVertex;

    fn key(&self, types: &mut TypeRegistry) -> TypeKey {
        types.key_named(&format!("mesh:{}:{}", self.path.display(), self.scale))
    }

    fn recipe(&self, gfx: &mut Graphics) -> Result<Recipe<NormalVertex>, RenderError> {
        let path = gfx.asset_path(&self.path);
        let scene = gfx.import(&path)?;
        let mesh = scene.first_mesh(&path)?;
        if mesh.normals.len() != mesh.positions.len() {
            return Err(RenderError::MissingNormals(mesh.name.clone()));
        }
        let vertices = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(p, n)| NormalVertex {
                pos: p.map(|c| c * self.scale),
                normal: *n,
            })
            .collect();
        Ok(Recipe {
            label: format!("mesh {}", path.display()),
            vertices,
            indices: mesh.triangle_indices()?,
            vertex_shader: PHONG_VS,
            pixel_shader: PHONG_PS,
            topology: Topology::TriangleList,
            extras: Vec::new(),
        })
    }
}

/// Flat white sphere of the given radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolidSphere {
    pub radius: f32,
}

impl SolidSphere {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Shape for SolidSphere {
    type Vertex = ColorVertex;

    fn key(&self, types: &mut TypeRegistry) -> TypeKey {
        types.key_named(&format!("sphere:{}", self.radius))
    }

    fn recipe(&self, gfx: &mut Graphics) -> Result<Recipe<ColorVertex>, RenderError> {
        let path = gfx.asset_path(SPHERE_MODEL);
        let scene = gfx.import(&path)?;
        let mesh = scene.first_mesh(&path)?;
        let vertices = mesh
            .positions
            .iter()
            .map(|p| ColorVertex::new(p.map(|c| c * self.radius), Rgba8::WHITE))
            .collect();
        Ok(Recipe::colored(
            format!("sphere r={}", self.radius),
            vertices,
            mesh.triangle_indices()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::HeadlessDevice;
    use crate::render::context::GraphicsConfig;
    use crate::render::drawable::Motion;

    fn graphics() -> Graphics {
        Graphics::new(Box::new(HeadlessDevice::new()), GraphicsConfig::default())
    }

    #[test]
    fn sphere_vertices_scale_with_radius() {
        let mut gfx = graphics();
        let unit = SolidSphere::new(1.0).recipe(&mut gfx).unwrap();
        let big = SolidSphere::new(3.0).recipe(&mut gfx).unwrap();
        assert_eq!(unit.vertices.len(), big.vertices.len());
        for (u, b) in unit.vertices.iter().zip(&big.vertices) {
            for k in 0..3 {
                assert!((u.pos[k] * 3.0 - b.pos[k]).abs() < 1e-5);
            }
        }
        assert!(big.vertices.iter().all(|v| v.color == Rgba8::WHITE));
    }

    #[test]
    fn sphere_file_is_parsed_once_across_radii() {
        let mut gfx = graphics();
        SolidSphere::new(0.5).spawn(&mut gfx, Motion::at_rest()).unwrap();
        SolidSphere::new(2.0).spawn(&mut gfx, Motion::at_rest()).unwrap();
        assert_eq!(gfx.imported_scenes(), 1);
        // Different radii are different kinds.
        assert_eq!(gfx.shared().len(), 2);
    }

    #[test]
    fn mesh_keys_include_scale() {
        let mut types = TypeRegistry::new();
        let a = Mesh::new("models/torus.obj", 1.0).key(&mut types);
        let b = Mesh::new("models/torus.obj", 2.0).key(&mut types);
        let c = Mesh::new("models/torus.obj", 1.0).key(&mut types);
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn mesh_uses_phong_layout() {
        let mut gfx = graphics();
        let recipe = Mesh::new("models/torus.obj", 2.0).recipe(&mut gfx).unwrap();
        assert_eq!(recipe.vertex_shader, PHONG_VS);
        assert_eq!(recipe.indices.len() % 3, 0);
        Mesh::new("models/torus.obj", 2.0)
            .spawn(&mut gfx, Motion::at_rest())
            .unwrap();
    }

    #[test]
    fn missing_mesh_file() {
        let mut gfx = graphics();
        let err = Mesh::new("models/none.obj", 1.0)
            .spawn(&mut gfx, Motion::at_rest())
            .unwrap_err();
        assert!(matches!(err, RenderError::FileNotFound(_)));
    }
}
