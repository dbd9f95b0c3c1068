//! Shape recipes: how each drawable kind builds its shared binding list.
//!
//! Every kind follows the same recipe. Build vertices and indices on the CPU,
//! fetch shaders and geometry buffers through the cache, derive the input
//! layout from the vertex shader, then append the topology and any material
//! bindables. The first [`Shape::spawn`] of a kind stores the result in the
//! shared registry; later spawns only create an [`Instance`].

mod mesh;
mod primitives;
mod surface;
mod vertex;

use crate::gfx::{ResourceId, Topology};
use crate::render::bindable::{Bindable, InputLayout};
use crate::render::context::Graphics;
use crate::render::drawable::{Bindings, Instance, Motion, TypeKey, TypeRegistry};
use crate::render::error::RenderError;

pub use mesh::{Mesh, SolidSphere, SPHERE_MODEL};
pub use primitives::{Cube, Plane, Prism, Pyramid};
pub use surface::{Surface, SURFACE_IMAGE};
pub use vertex::{ColorVertex, NormalVertex, TexturedVertex, Vertex};

pub const COLOR_VS: &str = "shaders/color_vs.wgsl";
pub const COLOR_PS: &str = "shaders/color_ps.wgsl";
pub const TEXTURE_VS: &str = "shaders/texture_vs.wgsl";
pub const TEXTURE_PS: &str = "shaders/texture_ps.wgsl";
pub const PHONG_VS: &str = "shaders/phong_vs.wgsl";
pub const PHONG_PS: &str = "shaders/phong_ps.wgsl";

/// CPU-side description of one drawable kind.
#[derive(Debug)]
pub struct Recipe<V: Vertex> {
    pub label: String,
    pub vertices: Vec<V>,
    pub indices: Vec<u16>,
    /// Shader paths, relative to the asset root.
    pub vertex_shader: &'static str,
    pub pixel_shader: &'static str,
    pub topology: Topology,
    /// Material bindables appended after the topology.
    pub extras: Vec<Bindable>,
}

impl<V: Vertex> Recipe<V> {
    /// Colored geometry drawn with the flat color shaders.
    pub fn colored(label: impl Into<String>, vertices: Vec<V>, indices: Vec<u16>) -> Self {
        Self {
            label: label.into(),
            vertices,
            indices,
            vertex_shader: COLOR_VS,
            pixel_shader: COLOR_PS,
            topology: Topology::TriangleList,
            extras: Vec::new(),
        }
    }

    /// Resolve through the cache and assemble the shared binding list for `key`.
    ///
    /// On failure the resources owned by `extras` are released; cached
    /// resources stay in the cache.
    pub fn build(self, gfx: &mut Graphics, key: TypeKey) -> Result<Bindings, RenderError> {
        let owned: Vec<ResourceId> = self.extras.iter().filter_map(|b| b.owned_resource()).collect();
        self.assemble(gfx, key).or_else(|err| {
            for id in owned {
                gfx.device().release(id)?;
            }
            Err(err)
        })
    }

    fn assemble(self, gfx: &mut Graphics, key: TypeKey) -> Result<Bindings, RenderError> {
        let vertex_buffer = gfx.vertex_buffer(key, &self.label, &self.vertices)?;
        let vertex_shader = gfx.vertex_shader(self.vertex_shader)?;
        let pixel_shader = gfx.pixel_shader(self.pixel_shader)?;
        let index_buffer = gfx.index_buffer(key, &self.label, &self.indices)?;
        let layout = InputLayout::new(gfx.device(), V::ELEMENTS, &vertex_shader)?;

        let mut bindings = Bindings::new();
        bindings.push(Bindable::VertexBuffer(vertex_buffer))?;
        bindings.push(Bindable::VertexShader(vertex_shader))?;
        bindings.push(Bindable::PixelShader(pixel_shader))?;
        bindings.set_index_buffer(index_buffer)?;
        bindings.push(Bindable::InputLayout(layout))?;
        bindings.push(Bindable::Topology(self.topology))?;
        for extra in self.extras {
            bindings.push(extra)?;
        }
        Ok(bindings)
    }
}

/// A drawable kind.
pub trait Shape: Sized + 'static {
    type Vertex: Vertex;

    /// Identity of the kind. Kinds parameterized at runtime override this so
    /// each parameter set gets its own shared slot.
    fn key(&self, types: &mut TypeRegistry) -> TypeKey {
        types.key_of::<Self>()
    }

    fn recipe(&self, gfx: &mut Graphics) -> Result<Recipe<Self::Vertex>, RenderError>;

    /// Create one instance, populating the kind's shared slot on first use.
    fn spawn(&self, gfx: &mut Graphics, motion: Motion) -> Result<Instance, RenderError> {
        let key = self.key(gfx.types_mut());
        if !gfx.shared().contains(key) {
            let recipe = self.recipe(gfx)?;
            let label = recipe.label.clone();
            let bindings = recipe.build(gfx, key)?;
            log::debug!("shared slot for `{label}` ({key}): {} bindables", bindings.len());
            gfx.shared_mut().insert(key, bindings)?;
        }
        Ok(Instance::new(key, motion))
    }
}
