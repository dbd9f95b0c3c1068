//! Read-or-create stores that keep one live resource per identity.
//!
//! Shaders are keyed by file name (last path segment), geometry buffers by
//! the [`TypeKey`] of the drawable kind that owns them. Entries live until
//! [`ResourceCache::release_all`]; there is no eviction.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::Path;
use std::rc::Rc;

use crate::gfx::{Device, GfxError, ResourceId};
use crate::render::bindable::{IndexBuffer, PixelShader, VertexBuffer, VertexShader};
use crate::render::drawable::TypeKey;
use crate::render::error::RenderError;
use crate::render::shapes::Vertex;

/// Entry counts per store.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CacheStats {
    pub vertex_shaders: usize,
    pub pixel_shaders: usize,
    pub vertex_buffers: usize,
    pub index_buffers: usize,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.vertex_shaders + self.pixel_shaders + self.vertex_buffers + self.index_buffers
    }
}

#[derive(Debug, Default)]
pub struct ResourceCache {
    vertex_shaders: HashMap<String, Rc<VertexShader>>,
    pixel_shaders: HashMap<String, Rc<PixelShader>>,
    vertex_buffers: HashMap<TypeKey, Rc<VertexBuffer>>,
    index_buffers: HashMap<TypeKey, Rc<IndexBuffer>>,
}

/// Cache key of a shader file: its last path segment.
pub fn shader_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_or_create<K, T, E>(
    map: &mut HashMap<K, Rc<T>>,
    key: K,
    what: &str,
    create: impl FnOnce() -> Result<T, E>,
) -> Result<Rc<T>, E>
where
    K: Eq + Hash + Debug,
{
    if let Some(found) = map.get(&key) {
        return Ok(Rc::clone(found));
    }
    log::debug!("{what} cache miss: {key:?}");
    let created = Rc::new(create()?);
    map.insert(key, Rc::clone(&created));
    Ok(created)
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_shader(
        &mut self,
        device: &mut dyn Device,
        path: &Path,
        entry_point: &str,
    ) -> Result<Rc<VertexShader>, RenderError> {
        read_or_create(&mut self.vertex_shaders, shader_key(path), "vertex shader", || {
            VertexShader::from_file(device, path, entry_point)
        })
    }

    pub fn pixel_shader(
        &mut self,
        device: &mut dyn Device,
        path: &Path,
        entry_point: &str,
    ) -> Result<Rc<PixelShader>, RenderError> {
        read_or_create(&mut self.pixel_shaders, shader_key(path), "pixel shader", || {
            PixelShader::from_file(device, path, entry_point)
        })
    }

    /// `vertices` is only read on a miss.
    pub fn vertex_buffer<V: Vertex>(
        &mut self,
        device: &mut dyn Device,
        key: TypeKey,
        label: &str,
        vertices: &[V],
    ) -> Result<Rc<VertexBuffer>, GfxError> {
        read_or_create(&mut self.vertex_buffers, key, "vertex buffer", || {
            VertexBuffer::new(device, label, vertices)
        })
    }

    /// `indices` is only read on a miss.
    pub fn index_buffer(
        &mut self,
        device: &mut dyn Device,
        key: TypeKey,
        label: &str,
        indices: &[u16],
    ) -> Result<Rc<IndexBuffer>, GfxError> {
        read_or_create(&mut self.index_buffers, key, "index buffer", || {
            IndexBuffer::new(device, label, indices)
        })
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            vertex_shaders: self.vertex_shaders.len(),
            pixel_shaders: self.pixel_shaders.len(),
            vertex_buffers: self.vertex_buffers.len(),
            index_buffers: self.index_buffers.len(),
        }
    }

    /// Release every entry through `device` and empty the cache.
    ///
    /// Handles still held elsewhere go stale; call this after the drawables
    /// and shared slots are gone.
    pub fn release_all(&mut self, device: &mut dyn Device) -> Result<(), GfxError> {
        let mut ids: Vec<ResourceId> = Vec::with_capacity(self.stats().total());
        ids.extend(self.vertex_shaders.drain().map(|(_, s)| ResourceId::from(s.id())));
        ids.extend(self.pixel_shaders.drain().map(|(_, s)| ResourceId::from(s.id())));
        ids.extend(self.vertex_buffers.drain().map(|(_, b)| ResourceId::from(b.id())));
        ids.extend(self.index_buffers.drain().map(|(_, b)| ResourceId::from(b.id())));
        log::debug!("releasing {} cached resources", ids.len());
        ids.into_iter().try_for_each(|id| device.release(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::HeadlessDevice;
    use crate::render::color::Rgba8;
    use crate::render::drawable::TypeRegistry;
    use crate::render::shapes::ColorVertex;
    use std::path::PathBuf;

    fn shader(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/shaders").join(name)
    }

    fn tri() -> [ColorVertex; 3] {
        [
            ColorVertex::new([0.0, 0.0, 0.0], Rgba8::RED),
            ColorVertex::new([1.0, 0.0, 0.0], Rgba8::GREEN),
            ColorVertex::new([0.0, 1.0, 0.0], Rgba8::BLUE),
        ]
    }

    #[test]
    fn shader_key_is_file_name() {
        assert_eq!(shader_key(Path::new("a/b/color_vs.wgsl")), "color_vs.wgsl");
        assert_eq!(shader_key(Path::new("color_vs.wgsl")), "color_vs.wgsl");
    }

    #[test]
    fn shader_lookup_is_idempotent() {
        let mut dev = HeadlessDevice::new();
        let mut cache = ResourceCache::new();
        let a = cache.vertex_shader(&mut dev, &shader("color_vs.wgsl"), "main").unwrap();
        let b = cache.vertex_shader(&mut dev, &shader("color_vs.wgsl"), "main").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(cache.stats().vertex_shaders, 1);
        assert_eq!(dev.live(), 1);
    }

    #[test]
    fn missing_shader_file_is_reported_and_not_cached() {
        let mut dev = HeadlessDevice::new();
        let mut cache = ResourceCache::new();
        let err = cache.pixel_shader(&mut dev, &shader("nope_ps.wgsl"), "main").unwrap_err();
        assert!(matches!(err, RenderError::FileNotFound(_)));
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn buffers_are_keyed_by_type() {
        let mut dev = HeadlessDevice::new();
        let mut types = TypeRegistry::new();
        let (k1, k2) = (types.key_named("one"), types.key_named("two"));
        let mut cache = ResourceCache::new();

        let a = cache.vertex_buffer(&mut dev, k1, "one", &tri()).unwrap();
        let b = cache.vertex_buffer(&mut dev, k1, "one", &tri()[..1]).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(b.count(), 3, "hit ignores the new contents");

        let c = cache.vertex_buffer(&mut dev, k2, "two", &tri()).unwrap();
        assert!(!Rc::ptr_eq(&a, &c));

        cache.index_buffer(&mut dev, k1, "one", &[0, 1, 2]).unwrap();
        cache.index_buffer(&mut dev, k1, "one", &[0, 1, 2]).unwrap();
        assert_eq!(
            cache.stats(),
            CacheStats {
                vertex_shaders: 0,
                pixel_shaders: 0,
                vertex_buffers: 2,
                index_buffers: 1,
            }
        );
    }

    #[test]
    fn release_all_empties_the_device() {
        let mut dev = HeadlessDevice::new();
        let mut types = TypeRegistry::new();
        let key = types.key_named("k");
        let mut cache = ResourceCache::new();
        cache.vertex_shader(&mut dev, &shader("color_vs.wgsl"), "main").unwrap();
        cache.pixel_shader(&mut dev, &shader("color_ps.wgsl"), "main").unwrap();
        cache.vertex_buffer(&mut dev, key, "k", &tri()).unwrap();
        cache.index_buffer(&mut dev, key, "k", &[0, 1, 2]).unwrap();
        assert_eq!(dev.live(), 4);

        cache.release_all(&mut dev).unwrap();
        assert_eq!(dev.live(), 0);
        assert_eq!(cache.stats().total(), 0);
    }
}
