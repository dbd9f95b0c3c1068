//! Drawables and the binding lists they draw with.
//!
//! A drawable owns an instance list (at least its transform) and refers to
//! the shared list of its kind by [`TypeKey`]. Drawing applies the shared list
//! first, then the instance list, then issues one indexed draw.

mod instance;
mod motion;
mod shared;

use std::rc::Rc;

use glam::Mat4;

use crate::gfx::GfxError;
use crate::render::bindable::{BindCtx, Bindable, IndexBuffer, TransformBuffer};
use crate::render::context::Graphics;
use crate::render::error::RenderError;

pub use instance::Instance;
pub use motion::{roll_pitch_yaw, Motion};
pub use shared::{SharedRegistry, TypeKey, TypeRegistry};

pub trait Drawable {
    fn update(&mut self, dt: f32);

    fn transform(&self) -> Mat4;

    fn draw(&self, gfx: &mut Graphics) -> Result<(), RenderError>;

    /// Release the GPU resources this drawable owns outright. Shared and
    /// cached resources are left to [`Graphics::shutdown`].
    fn release(self: Box<Self>, _gfx: &mut Graphics) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Ordered bindables plus the index count of the index buffer among them.
#[derive(Debug, Default)]
pub struct Bindings {
    bindables: Vec<Bindable>,
    index_count: Option<u32>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding only the per-object transform.
    pub fn with_transform() -> Self {
        Self {
            bindables: vec![Bindable::Transform(TransformBuffer)],
            index_count: None,
        }
    }

    /// Index buffers go through [`Bindings::set_index_buffer`] so the count is recorded.
    pub fn push(&mut self, bindable: Bindable) -> Result<(), RenderError> {
        if matches!(bindable, Bindable::IndexBuffer(_)) {
            return Err(RenderError::IndexBufferAsBindable);
        }
        self.bindables.push(bindable);
        Ok(())
    }

    pub fn set_index_buffer(&mut self, buffer: Rc<IndexBuffer>) -> Result<(), RenderError> {
        if self.index_count.is_some() {
            return Err(RenderError::IndexBufferAlreadySet);
        }
        self.index_count = Some(buffer.count());
        self.bindables.push(Bindable::IndexBuffer(buffer));
        Ok(())
    }

    pub fn index_count(&self) -> Option<u32> {
        self.index_count
    }

    pub fn len(&self) -> usize {
        self.bindables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bindable> {
        self.bindables.iter()
    }

    pub fn apply(&self, ctx: &mut BindCtx<'_>) -> Result<(), GfxError> {
        self.bindables.iter().try_for_each(|b| b.apply(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{HeadlessDevice, Topology};

    #[test]
    fn index_buffer_must_use_setter() {
        let mut dev = HeadlessDevice::new();
        let ib = Rc::new(IndexBuffer::new(&mut dev, "ib", &[0, 1, 2]).unwrap());
        let mut b = Bindings::new();
        assert!(matches!(
            b.push(Bindable::IndexBuffer(ib.clone())),
            Err(RenderError::IndexBufferAsBindable)
        ));
        b.set_index_buffer(ib.clone()).unwrap();
        assert_eq!(b.index_count(), Some(3));
        assert!(matches!(b.set_index_buffer(ib), Err(RenderError::IndexBufferAlreadySet)));
    }

    #[test]
    fn order_is_insertion_order() {
        let mut dev = HeadlessDevice::new();
        let ib = Rc::new(IndexBuffer::new(&mut dev, "ib", &[0, 1, 2]).unwrap());
        let mut b = Bindings::new();
        b.push(Bindable::Topology(Topology::LineList)).unwrap();
        b.set_index_buffer(ib).unwrap();
        b.push(Bindable::Transform(TransformBuffer)).unwrap();
        let kinds: Vec<_> = b.iter().map(|x| x.kind()).collect();
        assert_eq!(kinds, ["topology", "index buffer", "transform"]);
    }
}
