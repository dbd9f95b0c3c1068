use std::marker::PhantomData;

use bytemuck::Pod;

use crate::gfx::{BufferDesc, BufferId, BufferKind, Device, GfxError, ShaderStage};

/// Where a constant buffer binds: stage plus slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ConstantSlot {
    pub id: BufferId,
    pub stage: ShaderStage,
    pub slot: u32,
}

impl ConstantSlot {
    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        device.set_constant_buffer(self.stage, self.slot, self.id)
    }
}

/// Typed constant buffer.
///
/// `T` must match the shader-side struct byte for byte, including the padding
/// that 16-byte vector alignment introduces. Nothing checks this at runtime.
#[derive(Debug)]
pub struct ConstantBuffer<T: Pod> {
    slot: ConstantSlot,
    _payload: PhantomData<T>,
}

impl<T: Pod> ConstantBuffer<T> {
    pub fn new(
        device: &mut dyn Device,
        stage: ShaderStage,
        slot: u32,
        initial: &T,
    ) -> Result<Self, GfxError> {
        debug_assert!(
            std::mem::size_of::<T>() % 16 == 0,
            "constant payloads are padded to 16 bytes"
        );
        let id = device.create_buffer(&BufferDesc {
            label: std::any::type_name::<T>(),
            kind: BufferKind::Constant,
            contents: bytemuck::bytes_of(initial),
        })?;
        Ok(Self {
            slot: ConstantSlot { id, stage, slot },
            _payload: PhantomData,
        })
    }

    pub fn vertex(device: &mut dyn Device, slot: u32, initial: &T) -> Result<Self, GfxError> {
        Self::new(device, ShaderStage::Vertex, slot, initial)
    }

    pub fn pixel(device: &mut dyn Device, slot: u32, initial: &T) -> Result<Self, GfxError> {
        Self::new(device, ShaderStage::Pixel, slot, initial)
    }

    /// Upload a new payload; takes effect for the next draw.
    pub fn update(&self, device: &mut dyn Device, value: &T) -> Result<(), GfxError> {
        device.write_buffer(self.slot.id, bytemuck::bytes_of(value))
    }

    pub fn slot(&self) -> ConstantSlot {
        self.slot
    }

    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        self.slot.apply(device)
    }
}
