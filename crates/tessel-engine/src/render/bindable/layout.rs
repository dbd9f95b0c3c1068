use crate::gfx::{Device, GfxError, InputElement, LayoutId};

use super::shader::VertexShader;

#[derive(Debug)]
pub struct InputLayout {
    id: LayoutId,
}

impl InputLayout {
    /// Fails if `elements` does not cover every input of `shader`.
    pub fn new(
        device: &mut dyn Device,
        elements: &[InputElement],
        shader: &VertexShader,
    ) -> Result<Self, GfxError> {
        let id = device.create_input_layout(elements, shader.bytecode())?;
        Ok(Self { id })
    }

    pub fn id(&self) -> LayoutId {
        self.id
    }

    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        device.set_input_layout(self.id)
    }
}
