use std::path::Path;
use std::rc::Rc;

use crate::gfx::{Device, GfxError, ShaderBytecode, ShaderDesc, ShaderId, ShaderStage};
use crate::render::error::RenderError;

fn read_source(path: &Path) -> Result<String, RenderError> {
    if !path.exists() {
        return Err(RenderError::FileNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn compile(
    device: &mut dyn Device,
    label: &str,
    source: &str,
    entry_point: &str,
    stage: ShaderStage,
) -> Result<(ShaderId, Rc<ShaderBytecode>), GfxError> {
    let compiled = device.compile_shader(&ShaderDesc {
        label,
        source,
        entry_point,
        stage,
    })?;
    log::debug!("compiled {} shader `{label}`", stage.name());
    Ok((compiled.id, compiled.bytecode))
}

/// Vertex stage program. Keeps its reflected bytecode so input layouts can
/// be validated against it.
#[derive(Debug)]
pub struct VertexShader {
    id: ShaderId,
    bytecode: Rc<ShaderBytecode>,
}

impl VertexShader {
    pub fn from_file(device: &mut dyn Device, path: &Path, entry_point: &str) -> Result<Self, RenderError> {
        let source = read_source(path)?;
        Ok(Self::from_source(device, &path.display().to_string(), &source, entry_point)?)
    }

    pub fn from_source(
        device: &mut dyn Device,
        label: &str,
        source: &str,
        entry_point: &str,
    ) -> Result<Self, GfxError> {
        let (id, bytecode) = compile(device, label, source, entry_point, ShaderStage::Vertex)?;
        Ok(Self { id, bytecode })
    }

    pub fn id(&self) -> ShaderId {
        self.id
    }

    pub fn bytecode(&self) -> &ShaderBytecode {
        &self.bytecode
    }

    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        device.set_shader(ShaderStage::Vertex, self.id)
    }
}

#[derive(Debug)]
pub struct PixelShader {
    id: ShaderId,
}

impl PixelShader {
    pub fn from_file(device: &mut dyn Device, path: &Path, entry_point: &str) -> Result<Self, RenderError> {
        let source = read_source(path)?;
        Ok(Self::from_source(device, &path.display().to_string(), &source, entry_point)?)
    }

    pub fn from_source(
        device: &mut dyn Device,
        label: &str,
        source: &str,
        entry_point: &str,
    ) -> Result<Self, GfxError> {
        let (id, _) = compile(device, label, source, entry_point, ShaderStage::Pixel)?;
        Ok(Self { id })
    }

    pub fn id(&self) -> ShaderId {
        self.id
    }

    pub fn apply(&self, device: &mut dyn Device) -> Result<(), GfxError> {
        device.set_shader(ShaderStage::Pixel, self.id)
    }
}
