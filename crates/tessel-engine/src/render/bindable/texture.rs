use crate::gfx::{Device, GfxError, SamplerDesc, SamplerId, TextureDesc, TextureId};
use crate::render::image::Image;

/// Texture and sampler slot used by the textured shaders.
pub const MATERIAL_SLOT: u32 = 0;

#[derive(Debug)]
pub struct Texture {
    id: TextureId,
}

impl Texture {
    pub fn new(device: &mut dyn Device, label: &str, image: &Image) -> Result<Self, GfxError> {
        let id = device.create_texture(&TextureDesc {
            label,
            width: image.width(),
            height: image.height(),
            pixels: image.as_bytes(),
        })?;
        Ok(Self { id })
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        device.set_texture(MATERIAL_SLOT, self.id)
    }
}

#[derive(Debug)]
pub struct Sampler {
    id: SamplerId,
}

impl Sampler {
    /// Linear filtering, wrapping addressing.
    pub fn new(device: &mut dyn Device) -> Result<Self, GfxError> {
        Self::with_desc(device, &SamplerDesc::default())
    }

    pub fn with_desc(device: &mut dyn Device, desc: &SamplerDesc) -> Result<Self, GfxError> {
        let id = device.create_sampler(desc)?;
        Ok(Self { id })
    }

    pub fn id(&self) -> SamplerId {
        self.id
    }

    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        device.set_sampler(MATERIAL_SLOT, self.id)
    }
}
