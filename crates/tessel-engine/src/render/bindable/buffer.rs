use crate::gfx::{BufferDesc, BufferId, BufferKind, Device, GfxError};
use crate::render::shapes::Vertex;

#[derive(Debug)]
pub struct VertexBuffer {
    id: BufferId,
    stride: u32,
    count: u32,
}

impl VertexBuffer {
    pub fn new<V: Vertex>(device: &mut dyn Device, label: &str, vertices: &[V]) -> Result<Self, GfxError> {
        let stride = std::mem::size_of::<V>() as u32;
        let id = device.create_buffer(&BufferDesc {
            label,
            kind: BufferKind::Vertex { stride },
            contents: bytemuck::cast_slice(vertices),
        })?;
        Ok(Self {
            id,
            stride,
            count: vertices.len() as u32,
        })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        device.set_vertex_buffer(self.id)
    }
}

/// 16-bit index list.
#[derive(Debug)]
pub struct IndexBuffer {
    id: BufferId,
    count: u32,
}

impl IndexBuffer {
    pub fn new(device: &mut dyn Device, label: &str, indices: &[u16]) -> Result<Self, GfxError> {
        let id = device.create_buffer(&BufferDesc {
            label,
            kind: BufferKind::Index,
            contents: bytemuck::cast_slice(indices),
        })?;
        Ok(Self {
            id,
            count: indices.len() as u32,
        })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Number of indices; the element count of a full draw.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        device.set_index_buffer(self.id)
    }
}
