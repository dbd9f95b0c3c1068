//! Bindables: units of pipeline state with a uniform `apply` contract.
//!
//! The set of kinds is closed, so they are one enum rather than a trait
//! object hierarchy. Kinds that the resource cache deduplicates (shaders and
//! geometry buffers) are held through `Rc`; the cache owns them and releases
//! them at shutdown. Everything else is owned by the binding list holding it.
//!
//! `apply` is idempotent and order-independent. The one construction-time
//! coupling is that an [`InputLayout`] is built from its [`VertexShader`].

mod buffer;
mod constant;
mod layout;
mod shader;
mod texture;
mod transform;

use std::rc::Rc;

use glam::Mat4;

use crate::gfx::{BufferId, Device, GfxError, ResourceId, Topology};

pub use buffer::{IndexBuffer, VertexBuffer};
pub use constant::{ConstantBuffer, ConstantSlot};
pub use layout::InputLayout;
pub use shader::{PixelShader, VertexShader};
pub use texture::{Sampler, Texture, MATERIAL_SLOT};
pub use transform::{TransformBuffer, TransformUniform, TRANSFORM_SLOT};

/// Everything a bindable may need while applying itself.
pub struct BindCtx<'a> {
    pub device: &'a mut dyn Device,
    /// The process-wide transform constant buffer.
    pub transform_buffer: BufferId,
    /// Transform of the object being drawn.
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

#[derive(Debug)]
pub enum Bindable {
    VertexShader(Rc<VertexShader>),
    PixelShader(Rc<PixelShader>),
    VertexBuffer(Rc<VertexBuffer>),
    IndexBuffer(Rc<IndexBuffer>),
    Constants(ConstantSlot),
    InputLayout(InputLayout),
    Texture(Texture),
    Sampler(Sampler),
    Topology(Topology),
    Transform(TransformBuffer),
}

impl Bindable {
    pub fn apply(&self, ctx: &mut BindCtx<'_>) -> Result<(), GfxError> {
        match self {
            Bindable::VertexShader(vs) => vs.apply(ctx.device),
            Bindable::PixelShader(ps) => ps.apply(ctx.device),
            Bindable::VertexBuffer(vb) => vb.apply(ctx.device),
            Bindable::IndexBuffer(ib) => ib.apply(ctx.device),
            Bindable::Constants(slot) => slot.apply(ctx.device),
            Bindable::InputLayout(layout) => layout.apply(ctx.device),
            Bindable::Texture(tex) => tex.apply(ctx.device),
            Bindable::Sampler(sampler) => sampler.apply(ctx.device),
            Bindable::Topology(topology) => {
                ctx.device.set_topology(*topology);
                Ok(())
            }
            Bindable::Transform(t) => t.apply(
                ctx.device,
                ctx.transform_buffer,
                ctx.model,
                ctx.view,
                ctx.projection,
            ),
        }
    }

    /// Device resource this bindable owns outright, if any.
    ///
    /// Cache-backed kinds report `None`: the cache releases those.
    pub fn owned_resource(&self) -> Option<ResourceId> {
        match self {
            Bindable::InputLayout(layout) => Some(layout.id().into()),
            Bindable::Texture(tex) => Some(tex.id().into()),
            Bindable::Sampler(sampler) => Some(sampler.id().into()),
            Bindable::Constants(slot) => Some(slot.id.into()),
            Bindable::VertexShader(_)
            | Bindable::PixelShader(_)
            | Bindable::VertexBuffer(_)
            | Bindable::IndexBuffer(_)
            | Bindable::Topology(_)
            | Bindable::Transform(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Bindable::VertexShader(_) => "vertex shader",
            Bindable::PixelShader(_) => "pixel shader",
            Bindable::VertexBuffer(_) => "vertex buffer",
            Bindable::IndexBuffer(_) => "index buffer",
            Bindable::Constants(_) => "constant buffer",
            Bindable::InputLayout(_) => "input layout",
            Bindable::Texture(_) => "texture",
            Bindable::Sampler(_) => "sampler",
            Bindable::Topology(_) => "topology",
            Bindable::Transform(_) => "transform",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{BufferDesc, BufferKind, Call, HeadlessDevice, ShaderStage};

    fn transform_buffer(dev: &mut HeadlessDevice) -> BufferId {
        dev.create_buffer(&BufferDesc {
            label: "transform",
            kind: BufferKind::Constant,
            contents: &[0; std::mem::size_of::<TransformUniform>()],
        })
        .unwrap()
    }

    #[test]
    fn transform_uniform_is_two_matrices() {
        assert_eq!(std::mem::size_of::<TransformUniform>(), 128);
    }

    #[test]
    fn transform_uploads_then_binds() {
        let mut dev = HeadlessDevice::new();
        let log = dev.log();
        let buffer = transform_buffer(&mut dev);
        log.clear();

        let model = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let mut ctx = BindCtx {
            device: &mut dev,
            transform_buffer: buffer,
            model,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        Bindable::Transform(TransformBuffer).apply(&mut ctx).unwrap();

        assert_eq!(
            log.calls(),
            vec![
                Call::WriteBuffer { id: buffer, size: 128 },
                Call::SetConstantBuffer {
                    stage: ShaderStage::Vertex,
                    slot: TRANSFORM_SLOT,
                    id: buffer
                },
            ]
        );
        let written: &[f32] = bytemuck::cast_slice(dev.buffer_data(buffer).unwrap());
        // mvp == model with identity view/projection; translation sits in column 3.
        assert_eq!(&written[28..31], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn transform_is_recomputed_at_bind_time() {
        let mut dev = HeadlessDevice::new();
        let buffer = transform_buffer(&mut dev);
        for x in [1.0, 5.0] {
            let mut ctx = BindCtx {
                device: &mut dev,
                transform_buffer: buffer,
                model: Mat4::from_translation(glam::Vec3::X * x),
                view: Mat4::IDENTITY,
                projection: Mat4::IDENTITY,
            };
            Bindable::Transform(TransformBuffer).apply(&mut ctx).unwrap();
            let written: &[f32] = bytemuck::cast_slice(dev.buffer_data(buffer).unwrap());
            assert_eq!(written[12], x);
        }
    }

    #[test]
    fn only_unshared_kinds_report_owned_resources() {
        let mut dev = HeadlessDevice::new();
        let sampler = Sampler::new(&mut dev).unwrap();
        let id = sampler.id();
        assert_eq!(Bindable::Sampler(sampler).owned_resource(), Some(id.into()));
        assert_eq!(Bindable::Topology(Topology::TriangleList).owned_resource(), None);
        assert_eq!(Bindable::Transform(TransformBuffer).owned_resource(), None);
    }
}
