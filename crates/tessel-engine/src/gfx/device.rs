use std::rc::Rc;

use super::error::GfxError;
use super::handle::{BufferId, LayoutId, ResourceId, SamplerId, ShaderId, TextureId};

/// Largest constant payload a single constant buffer may hold, in bytes.
pub const MAX_CONSTANT_SIZE: usize = 256;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Pixel => "pixel",
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
    /// Four normalized bytes, read as a `vec4<f32>` in 0..=1.
    Unorm8x4,
}

impl VertexFormat {
    pub fn size(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
            VertexFormat::Unorm8x4 => 4,
        }
    }
}

/// One attribute of a vertex input layout.
///
/// Elements map to shader input locations by position: the first element feeds
/// `@location(0)`, the second `@location(1)` and so on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct InputElement {
    pub semantic: &'static str,
    pub format: VertexFormat,
    pub offset: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex { stride: u32 },
    /// 16-bit indices.
    Index,
    /// CPU-writable constants, at most [`MAX_CONSTANT_SIZE`] bytes.
    Constant,
}

impl BufferKind {
    pub fn name(self) -> &'static str {
        match self {
            BufferKind::Vertex { .. } => "vertex",
            BufferKind::Index => "index",
            BufferKind::Constant => "constant",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub kind: BufferKind,
    pub contents: &'a [u8],
}

#[derive(Debug, Clone, Copy)]
pub struct ShaderDesc<'a> {
    pub label: &'a str,
    pub source: &'a str,
    pub entry_point: &'a str,
    pub stage: ShaderStage,
}

/// Reflection data kept alongside a compiled shader.
///
/// Input layouts are validated against the vertex shader's bytecode, so the
/// vertex-shader bindable keeps this around after compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBytecode {
    pub label: String,
    pub stage: ShaderStage,
    pub entry_point: String,
    /// Sorted input locations consumed by a vertex entry point.
    pub vertex_inputs: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct CompiledShader {
    pub id: ShaderId,
    pub bytecode: Rc<ShaderBytecode>,
}

#[derive(Debug, Clone, Copy)]
pub struct TextureDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 rows, `width * 4` bytes each.
    pub pixels: &'a [u8],
}

impl TextureDesc<'_> {
    pub(crate) fn validate(&self) -> Result<(), GfxError> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.width == 0 || self.height == 0 || self.pixels.len() != expected {
            return Err(GfxError::InvalidTexture {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AddressMode {
    #[default]
    Wrap,
    Clamp,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SamplerDesc {
    pub filter: Filter,
    pub address: AddressMode,
}

/// Immediate-mode graphics device.
///
/// Creation calls return opaque handles. Binding calls mutate pipeline state
/// that persists until rebound; `draw_indexed` consumes whatever is bound at
/// the time of the call, including the current contents of bound constant
/// buffers.
pub trait Device {
    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> Result<BufferId, GfxError>;

    /// Overwrite a buffer's contents from offset zero.
    fn write_buffer(&mut self, id: BufferId, data: &[u8]) -> Result<(), GfxError>;

    fn compile_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<CompiledShader, GfxError>;

    /// Create a vertex input layout, validated against the vertex shader it feeds.
    fn create_input_layout(
        &mut self,
        elements: &[InputElement],
        vertex_shader: &ShaderBytecode,
    ) -> Result<LayoutId, GfxError>;

    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureId, GfxError>;

    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerId, GfxError>;

    fn release(&mut self, id: ResourceId) -> Result<(), GfxError>;

    // ── context ────────────────────────────────────────────────────────────

    fn set_shader(&mut self, stage: ShaderStage, id: ShaderId) -> Result<(), GfxError>;
    fn set_vertex_buffer(&mut self, id: BufferId) -> Result<(), GfxError>;
    fn set_index_buffer(&mut self, id: BufferId) -> Result<(), GfxError>;
    fn set_constant_buffer(
        &mut self,
        stage: ShaderStage,
        slot: u32,
        id: BufferId,
    ) -> Result<(), GfxError>;
    fn set_input_layout(&mut self, id: LayoutId) -> Result<(), GfxError>;
    fn set_topology(&mut self, topology: Topology);
    fn set_texture(&mut self, slot: u32, id: TextureId) -> Result<(), GfxError>;
    fn set_sampler(&mut self, slot: u32, id: SamplerId) -> Result<(), GfxError>;

    fn draw_indexed(&mut self, count: u32, start: u32, base: i32) -> Result<(), GfxError>;
}

/// Check an input layout against a vertex shader's reflected inputs.
pub fn check_signature(elements: &[InputElement], shader: &ShaderBytecode) -> Result<(), GfxError> {
    if shader.stage != ShaderStage::Vertex {
        return Err(GfxError::InvalidLayout(format!(
            "`{}` is a {} shader",
            shader.label,
            shader.stage.name()
        )));
    }
    if elements.is_empty() {
        return Err(GfxError::InvalidLayout("no elements".into()));
    }
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[i + 1..] {
            let overlap = a.offset < b.offset + b.format.size() && b.offset < a.offset + a.format.size();
            if overlap {
                return Err(GfxError::InvalidLayout(format!(
                    "elements `{}` and `{}` overlap",
                    a.semantic, b.semantic
                )));
            }
        }
    }
    match shader
        .vertex_inputs
        .iter()
        .find(|&&loc| loc as usize >= elements.len())
    {
        Some(&location) => Err(GfxError::SignatureMismatch {
            shader: shader.label.clone(),
            location,
        }),
        None => Ok(()),
    }
}

/// Parse and validate WGSL, then reflect the requested entry point.
pub(crate) fn reflect_shader(desc: &ShaderDesc<'_>) -> Result<ShaderBytecode, GfxError> {
    let compile_error = |message: String| GfxError::ShaderCompile {
        label: desc.label.to_string(),
        message,
    };

    let module = naga::front::wgsl::parse_str(desc.source)
        .map_err(|e| compile_error(e.emit_to_string(desc.source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| compile_error(e.emit_to_string(desc.source)))?;

    let wanted = match desc.stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Pixel => naga::ShaderStage::Fragment,
    };
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == desc.entry_point && ep.stage == wanted)
        .ok_or_else(|| GfxError::MissingEntryPoint {
            label: desc.label.to_string(),
            entry: desc.entry_point.to_string(),
            stage: desc.stage.name(),
        })?;

    let mut vertex_inputs = Vec::new();
    if desc.stage == ShaderStage::Vertex {
        for arg in &entry.function.arguments {
            match &arg.binding {
                Some(naga::Binding::Location { location, .. }) => vertex_inputs.push(*location),
                Some(naga::Binding::BuiltIn(_)) => {}
                None => {
                    if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                        vertex_inputs.extend(members.iter().filter_map(|m| match m.binding {
                            Some(naga::Binding::Location { location, .. }) => Some(location),
                            _ => None,
                        }));
                    }
                }
            }
        }
        vertex_inputs.sort_unstable();
    }

    Ok(ShaderBytecode {
        label: desc.label.to_string(),
        stage: desc.stage,
        entry_point: desc.entry_point.to_string(),
        vertex_inputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct In {
    @location(0) pos: vec3<f32>,
    @location(1) color: vec4<f32>,
}

@vertex
fn main(v: In) -> @builtin(position) vec4<f32> {
    return vec4<f32>(v.pos, 1.0) + v.color * 0.0;
}
"#;

    fn desc(source: &str, stage: ShaderStage) -> ShaderDesc<'_> {
        ShaderDesc { label: "test", source, entry_point: "main", stage }
    }

    fn element(offset: u32, format: VertexFormat) -> InputElement {
        InputElement { semantic: "X", format, offset }
    }

    // ── reflection ─────────────────────────────────────────────────────────

    #[test]
    fn reflects_struct_vertex_inputs() {
        let bc = reflect_shader(&desc(VS, ShaderStage::Vertex)).unwrap();
        assert_eq!(bc.vertex_inputs, vec![0, 1]);
        assert_eq!(bc.stage, ShaderStage::Vertex);
    }

    #[test]
    fn wrong_stage_is_missing_entry_point() {
        let err = reflect_shader(&desc(VS, ShaderStage::Pixel)).unwrap_err();
        assert!(matches!(err, GfxError::MissingEntryPoint { .. }));
    }

    #[test]
    fn syntax_error_is_compile_error() {
        let err = reflect_shader(&desc("fn main( {", ShaderStage::Vertex)).unwrap_err();
        assert!(matches!(err, GfxError::ShaderCompile { .. }));
    }

    // ── signature ──────────────────────────────────────────────────────────

    #[test]
    fn signature_accepts_matching_layout() {
        let bc = reflect_shader(&desc(VS, ShaderStage::Vertex)).unwrap();
        let elements = [
            element(0, VertexFormat::Float32x3),
            element(12, VertexFormat::Unorm8x4),
        ];
        assert!(check_signature(&elements, &bc).is_ok());
    }

    #[test]
    fn signature_rejects_missing_location() {
        let bc = reflect_shader(&desc(VS, ShaderStage::Vertex)).unwrap();
        let err = check_signature(&[element(0, VertexFormat::Float32x3)], &bc).unwrap_err();
        assert!(matches!(err, GfxError::SignatureMismatch { location: 1, .. }));
    }

    #[test]
    fn signature_rejects_overlap() {
        let bc = reflect_shader(&desc(VS, ShaderStage::Vertex)).unwrap();
        let elements = [
            element(0, VertexFormat::Float32x3),
            element(8, VertexFormat::Unorm8x4),
        ];
        assert!(matches!(
            check_signature(&elements, &bc),
            Err(GfxError::InvalidLayout(_))
        ));
    }
}
