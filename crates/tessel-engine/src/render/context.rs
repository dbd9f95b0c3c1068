//! The render context every drawable works through.
//!
//! [`Graphics`] is constructed explicitly by the host and passed by `&mut` to
//! shape construction, the scene loop and teardown. It owns the device, the
//! resource and mesh caches, the shared-slot registry and the one transform
//! constant buffer every instance writes into right before its draw.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::Mat4;

use crate::gfx::{BufferDesc, BufferId, BufferKind, Device, GfxError};

use super::bindable::{BindCtx, IndexBuffer, PixelShader, TransformUniform, VertexBuffer, VertexShader};
use super::cache::{CacheStats, ResourceCache};
use super::drawable::{Bindings, SharedRegistry, TypeKey, TypeRegistry};
use super::error::RenderError;
use super::import::{ImportedScene, MeshCache};
use super::shapes::Vertex;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsConfig {
    /// Base directory for shaders, models and images.
    pub asset_root: PathBuf,
    pub vertex_entry: String,
    pub pixel_entry: String,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            asset_root: Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
            vertex_entry: "main".into(),
            pixel_entry: "main".into(),
        }
    }
}

pub struct Graphics {
    device: Box<dyn Device>,
    config: GraphicsConfig,
    cache: ResourceCache,
    meshes: MeshCache,
    types: TypeRegistry,
    shared: SharedRegistry,
    transform_buffer: Option<BufferId>,
    view: Mat4,
    projection: Mat4,
}

impl Graphics {
    pub fn new(device: Box<dyn Device>, config: GraphicsConfig) -> Self {
        Self::with_importer(device, config, MeshCache::default())
    }

    pub fn with_importer(device: Box<dyn Device>, config: GraphicsConfig, meshes: MeshCache) -> Self {
        log::debug!("graphics context, assets at `{}`", config.asset_root.display());
        Self {
            device,
            config,
            cache: ResourceCache::new(),
            meshes,
            types: TypeRegistry::new(),
            shared: SharedRegistry::new(),
            transform_buffer: None,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    pub fn device(&mut self) -> &mut dyn Device {
        self.device.as_mut()
    }

    pub fn config(&self) -> &GraphicsConfig {
        &self.config
    }

    /// Resolve `rel` against the asset root. Absolute paths pass through.
    pub fn asset_path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.config.asset_root.join(rel)
    }

    // ── cached resources ──────────────────────────────────────────────────

    pub fn vertex_shader(&mut self, rel: &str) -> Result<Rc<VertexShader>, RenderError> {
        let path = self.asset_path(rel);
        self.cache
            .vertex_shader(self.device.as_mut(), &path, &self.config.vertex_entry)
    }

    pub fn pixel_shader(&mut self, rel: &str) -> Result<Rc<PixelShader>, RenderError> {
        let path = self.asset_path(rel);
        self.cache
            .pixel_shader(self.device.as_mut(), &path, &self.config.pixel_entry)
    }

    pub fn vertex_buffer<V: Vertex>(
        &mut self,
        key: TypeKey,
        label: &str,
        vertices: &[V],
    ) -> Result<Rc<VertexBuffer>, RenderError> {
        Ok(self.cache.vertex_buffer(self.device.as_mut(), key, label, vertices)?)
    }

    pub fn index_buffer(
        &mut self,
        key: TypeKey,
        label: &str,
        indices: &[u16],
    ) -> Result<Rc<IndexBuffer>, RenderError> {
        Ok(self.cache.index_buffer(self.device.as_mut(), key, label, indices)?)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn import(&mut self, path: &Path) -> Result<Rc<ImportedScene>, RenderError> {
        self.meshes.load(path)
    }

    /// Distinct mesh files parsed so far.
    pub fn imported_scenes(&self) -> usize {
        self.meshes.len()
    }

    // ── registries ────────────────────────────────────────────────────────

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    pub fn shared(&self) -> &SharedRegistry {
        &self.shared
    }

    pub fn shared_mut(&mut self) -> &mut SharedRegistry {
        &mut self.shared
    }

    // ── camera ────────────────────────────────────────────────────────────

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    // ── drawing ───────────────────────────────────────────────────────────

    fn transform_buffer(&mut self) -> Result<BufferId, GfxError> {
        if let Some(id) = self.transform_buffer {
            return Ok(id);
        }
        let id = self.device.create_buffer(&BufferDesc {
            label: "transform",
            kind: BufferKind::Constant,
            contents: bytemuck::bytes_of(&TransformUniform::new(
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                Mat4::IDENTITY,
            )),
        })?;
        log::debug!("created shared transform buffer");
        self.transform_buffer = Some(id);
        Ok(id)
    }

    /// Apply the shared list of `shared` (if any), then `own`, then draw.
    ///
    /// The index count comes from whichever list carries the index buffer.
    /// If neither or both do, nothing is applied and the draw is refused.
    pub fn draw_bindings(
        &mut self,
        shared: Option<TypeKey>,
        own: &Bindings,
        model: Mat4,
    ) -> Result<(), RenderError> {
        let shared_count = match shared {
            Some(key) => self
                .shared
                .get(key)
                .ok_or(RenderError::MissingSharedSlot(key))?
                .index_count(),
            None => None,
        };
        if shared_count.is_some() && own.index_count().is_some() {
            return Err(RenderError::IndexBufferAlreadySet);
        }
        let count = shared_count
            .or(own.index_count())
            .ok_or(RenderError::MissingIndexBuffer)?;
        let transform_buffer = self.transform_buffer()?;
        let shared = shared.and_then(|key| self.shared.get(key));

        let mut ctx = BindCtx {
            device: self.device.as_mut(),
            transform_buffer,
            model,
            view: self.view,
            projection: self.projection,
        };
        if let Some(shared) = shared {
            shared.apply(&mut ctx)?;
        }
        own.apply(&mut ctx)?;
        ctx.device.draw_indexed(count, 0, 0)?;
        Ok(())
    }

    /// Release everything the context owns on the device.
    ///
    /// Shared slots go first so their cached handles are dropped before the
    /// cache releases them. The context stays usable; later draws recreate
    /// what they need.
    pub fn shutdown(&mut self) -> Result<(), RenderError> {
        let slots = self.shared.drain();
        let mut released = 0;
        for (_, bindings) in &slots {
            for id in bindings.iter().filter_map(|b| b.owned_resource()) {
                self.device.release(id)?;
                released += 1;
            }
        }
        drop(slots);
        let cached = self.cache.stats().total();
        self.cache.release_all(self.device.as_mut())?;
        if let Some(id) = self.transform_buffer.take() {
            self.device.release(id.into())?;
        }
        log::info!("graphics shutdown: released {released} bindables and {cached} cached resources");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Call, HeadlessDevice, ShaderStage};
    use crate::render::bindable::Bindable;
    use crate::render::drawable::{Drawable, Motion};
    use crate::render::shapes::{Cube, Plane, Shape, Surface};

    fn graphics() -> (Graphics, crate::gfx::CallLog) {
        let dev = HeadlessDevice::new();
        let log = dev.log();
        (Graphics::new(Box::new(dev), GraphicsConfig::default()), log)
    }

    fn position(calls: &[Call], pred: impl Fn(&Call) -> bool) -> usize {
        calls.iter().position(pred).unwrap()
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn plane_draws_six_indices_after_shared_bindings() {
        let (mut gfx, log) = graphics();
        let plane = Plane.spawn(&mut gfx, Motion::at_rest()).unwrap();
        log.clear();

        plane.draw(&mut gfx).unwrap();
        let calls = log.calls();

        let draws: Vec<_> = calls.iter().filter(|c| c.is_draw()).collect();
        assert_eq!(draws, [&Call::DrawIndexed { count: 6, start: 0, base: 0 }]);
        assert!(matches!(calls.last(), Some(Call::DrawIndexed { .. })));

        let transform = position(&calls, |c| {
            matches!(c, Call::SetConstantBuffer { stage: ShaderStage::Vertex, .. })
        });
        for shared in [
            position(&calls, |c| matches!(c, Call::SetVertexBuffer(_))),
            position(&calls, |c| matches!(c, Call::SetShader { stage: ShaderStage::Vertex, .. })),
            position(&calls, |c| matches!(c, Call::SetShader { stage: ShaderStage::Pixel, .. })),
            position(&calls, |c| matches!(c, Call::SetIndexBuffer(_))),
            position(&calls, |c| matches!(c, Call::SetInputLayout(_))),
            position(&calls, |c| matches!(c, Call::SetTopology(_))),
        ] {
            assert!(shared < transform);
        }
    }

    #[test]
    fn missing_index_buffer_refuses_to_draw() {
        let (mut gfx, log) = graphics();
        let own = Bindings::with_transform();
        log.clear();
        let err = gfx.draw_bindings(None, &own, Mat4::IDENTITY).unwrap_err();
        assert!(matches!(err, RenderError::MissingIndexBuffer));
        assert_eq!(log.count(|c| c.is_draw()), 0);
        assert_eq!(log.count(|c| c.is_create()), 0);
    }

    #[test]
    fn index_buffer_in_both_lists_refuses_to_draw() {
        let (mut gfx, log) = graphics();
        let plane = Plane.spawn(&mut gfx, Motion::at_rest()).unwrap();
        let ib = IndexBuffer::new(gfx.device(), "own", &[0, 1, 2]).unwrap();
        let mut own = Bindings::with_transform();
        own.set_index_buffer(Rc::new(ib)).unwrap();
        log.clear();

        let err = gfx
            .draw_bindings(Some(plane.key()), &own, Mat4::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, RenderError::IndexBufferAlreadySet));
        assert_eq!(log.count(|c| c.is_draw()), 0);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn unknown_shared_slot_is_an_error() {
        let (mut gfx, _) = graphics();
        let key = gfx.types_mut().key_named("ghost");
        let err = gfx
            .draw_bindings(Some(key), &Bindings::with_transform(), Mat4::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingSharedSlot(k) if k == key));
    }

    #[test]
    fn one_transform_buffer_for_all_instances() {
        let (mut gfx, log) = graphics();
        let a = Cube.spawn(&mut gfx, Motion::at_rest()).unwrap();
        let b = Plane.spawn(&mut gfx, Motion::at_rest()).unwrap();
        a.draw(&mut gfx).unwrap();
        b.draw(&mut gfx).unwrap();
        a.draw(&mut gfx).unwrap();
        let constants = log.count(|c| {
            matches!(c, Call::CreateBuffer { kind: BufferKind::Constant, .. })
        });
        assert_eq!(constants, 1);
        assert_eq!(log.count(|c| c.is_draw()), 3);
    }

    #[test]
    fn instance_bindables_follow_shared() {
        let (mut gfx, log) = graphics();
        let mut cube = Cube.spawn(&mut gfx, Motion::at_rest()).unwrap();
        cube.attach(Bindable::Topology(crate::gfx::Topology::LineList)).unwrap();
        log.clear();
        cube.draw(&mut gfx).unwrap();
        let topologies: Vec<_> = log
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetTopology(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(topologies, [crate::gfx::Topology::TriangleList, crate::gfx::Topology::LineList]);
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn shutdown_releases_everything() {
        let dev = HeadlessDevice::new();
        let log = dev.log();
        let mut gfx = Graphics::new(Box::new(dev), GraphicsConfig::default());
        for _ in 0..2 {
            Cube.spawn(&mut gfx, Motion::at_rest()).unwrap();
            Surface.spawn(&mut gfx, Motion::at_rest()).unwrap();
        }
        let plane = Plane.spawn(&mut gfx, Motion::at_rest()).unwrap();
        plane.draw(&mut gfx).unwrap();

        gfx.shutdown().unwrap();
        let created = log.count(Call::is_create);
        let released = log.count(|c| matches!(c, Call::Release(_)));
        assert_eq!(created, released);
        assert!(gfx.shared().is_empty());
        assert_eq!(gfx.cache_stats().total(), 0);
    }
}
