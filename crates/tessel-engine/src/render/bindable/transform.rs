use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::gfx::{BufferId, Device, GfxError, ShaderStage};

/// Vertex-stage constant slot the transform binds to.
pub const TRANSFORM_SLOT: u32 = 0;

/// Per-draw transform payload: model, and model-view-projection.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    pub mvp: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            mvp: (projection * view * model).to_cols_array_2d(),
        }
    }
}

/// Binds the drawing object's transform.
///
/// Owns nothing: every instance writes into the one process-wide transform
/// buffer right before its own draw, which is sound only because draws are
/// serialized.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TransformBuffer;

impl TransformBuffer {
    pub fn apply(
        &self,
        device: &mut dyn Device,
        buffer: BufferId,
        model: Mat4,
        view: Mat4,
        projection: Mat4,
    ) -> Result<(), GfxError> {
        let payload = TransformUniform::new(model, view, projection);
        device.write_buffer(buffer, bytemuck::bytes_of(&payload))?;
        device.set_constant_buffer(ShaderStage::Vertex, TRANSFORM_SLOT, buffer)
    }
}
