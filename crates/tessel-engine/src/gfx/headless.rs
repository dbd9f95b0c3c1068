use std::cell::RefCell;
use std::rc::Rc;

use generational_arena::Arena;

use super::device::{
    check_signature, reflect_shader, BufferDesc, BufferKind, CompiledShader, Device, InputElement,
    SamplerDesc, ShaderBytecode, ShaderDesc, ShaderStage, TextureDesc, Topology, MAX_CONSTANT_SIZE,
};
use super::error::GfxError;
use super::handle::{BufferId, LayoutId, ResourceId, SamplerId, ShaderId, TextureId};

/// One device call as observed by [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer { id: BufferId, kind: BufferKind, size: usize },
    WriteBuffer { id: BufferId, size: usize },
    CompileShader { id: ShaderId, stage: ShaderStage, label: String },
    CreateInputLayout { id: LayoutId, elements: usize },
    CreateTexture { id: TextureId, width: u32, height: u32 },
    CreateSampler { id: SamplerId },
    Release(ResourceId),
    SetShader { stage: ShaderStage, id: ShaderId },
    SetVertexBuffer(BufferId),
    SetIndexBuffer(BufferId),
    SetConstantBuffer { stage: ShaderStage, slot: u32, id: BufferId },
    SetInputLayout(LayoutId),
    SetTopology(Topology),
    SetTexture { slot: u32, id: TextureId },
    SetSampler { slot: u32, id: SamplerId },
    DrawIndexed { count: u32, start: u32, base: i32 },
}

impl Call {
    pub fn is_draw(&self) -> bool {
        matches!(self, Call::DrawIndexed { .. })
    }

    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Call::CreateBuffer { .. }
                | Call::CompileShader { .. }
                | Call::CreateInputLayout { .. }
                | Call::CreateTexture { .. }
                | Call::CreateSampler { .. }
        )
    }
}

/// Shared view of the calls a [`HeadlessDevice`] has received.
///
/// Clones observe the same log, so a test can keep one while the device is
/// boxed away inside a renderer.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

enum Resource {
    Buffer { kind: BufferKind, data: Vec<u8> },
    Shader(ShaderStage),
    Layout,
    Texture,
    Sampler,
}

#[derive(Default)]
struct Bound {
    vs: Option<ShaderId>,
    ps: Option<ShaderId>,
    vertex: Option<BufferId>,
    index: Option<BufferId>,
    layout: Option<LayoutId>,
}

/// GPU-less [`Device`].
///
/// Shaders are still parsed and validated, and input layouts are still checked
/// against vertex inputs, so anything that passes here fails on a real device
/// only for backend reasons.
#[derive(Default)]
pub struct HeadlessDevice {
    resources: Arena<Resource>,
    bound: Bound,
    log: CallLog,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Number of live resources.
    pub fn live(&self) -> usize {
        self.resources.len()
    }

    /// Current contents of a buffer.
    pub fn buffer_data(&self, id: BufferId) -> Option<&[u8]> {
        match self.resources.get(id.0) {
            Some(Resource::Buffer { data, .. }) => Some(data),
            _ => None,
        }
    }

    fn buffer(&self, id: BufferId) -> Result<BufferKind, GfxError> {
        match self.resources.get(id.0) {
            Some(Resource::Buffer { kind, .. }) => Ok(*kind),
            _ => Err(GfxError::InvalidHandle(id.into())),
        }
    }

    fn expect_kind(&self, id: BufferId, want: &'static str) -> Result<(), GfxError> {
        let kind = self.buffer(id)?;
        if kind.name() == want {
            Ok(())
        } else {
            Err(GfxError::WrongBufferKind(id, want))
        }
    }

    fn exists(&self, id: impl Into<ResourceId>) -> Result<(), GfxError> {
        let id = id.into();
        match self.resources.contains(id.index()) {
            true => Ok(()),
            false => Err(GfxError::InvalidHandle(id)),
        }
    }
}

impl Device for HeadlessDevice {
    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> Result<BufferId, GfxError> {
        if desc.contents.is_empty() {
            return Err(GfxError::EmptyBuffer(desc.kind.name()));
        }
        if desc.kind == BufferKind::Constant && desc.contents.len() > MAX_CONSTANT_SIZE {
            return Err(GfxError::ConstantTooLarge {
                size: desc.contents.len(),
                max: MAX_CONSTANT_SIZE,
            });
        }
        let id = BufferId(self.resources.insert(Resource::Buffer {
            kind: desc.kind,
            data: desc.contents.to_vec(),
        }));
        self.log.push(Call::CreateBuffer {
            id,
            kind: desc.kind,
            size: desc.contents.len(),
        });
        Ok(id)
    }

    fn write_buffer(&mut self, id: BufferId, bytes: &[u8]) -> Result<(), GfxError> {
        let Some(Resource::Buffer { kind, data }) = self.resources.get_mut(id.0) else {
            return Err(GfxError::InvalidHandle(id.into()));
        };
        if *kind == BufferKind::Constant && bytes.len() > MAX_CONSTANT_SIZE {
            return Err(GfxError::ConstantTooLarge {
                size: bytes.len(),
                max: MAX_CONSTANT_SIZE,
            });
        }
        if data.len() < bytes.len() {
            data.resize(bytes.len(), 0);
        }
        data[..bytes.len()].copy_from_slice(bytes);
        self.log.push(Call::WriteBuffer { id, size: bytes.len() });
        Ok(())
    }

    fn compile_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<CompiledShader, GfxError> {
        let bytecode = reflect_shader(desc)?;
        let id = ShaderId(self.resources.insert(Resource::Shader(desc.stage)));
        self.log.push(Call::CompileShader {
            id,
            stage: desc.stage,
            label: desc.label.to_string(),
        });
        Ok(CompiledShader {
            id,
            bytecode: Rc::new(bytecode),
        })
    }

    fn create_input_layout(
        &mut self,
        elements: &[InputElement],
        vertex_shader: &ShaderBytecode,
    ) -> Result<LayoutId, GfxError> {
        check_signature(elements, vertex_shader)?;
        let id = LayoutId(self.resources.insert(Resource::Layout));
        self.log.push(Call::CreateInputLayout {
            id,
            elements: elements.len(),
        });
        Ok(id)
    }

    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureId, GfxError> {
        desc.validate()?;
        let id = TextureId(self.resources.insert(Resource::Texture));
        self.log.push(Call::CreateTexture {
            id,
            width: desc.width,
            height: desc.height,
        });
        Ok(id)
    }

    fn create_sampler(&mut self, _desc: &SamplerDesc) -> Result<SamplerId, GfxError> {
        let id = SamplerId(self.resources.insert(Resource::Sampler));
        self.log.push(Call::CreateSampler { id });
        Ok(id)
    }

    fn release(&mut self, id: ResourceId) -> Result<(), GfxError> {
        self.resources
            .remove(id.index())
            .ok_or(GfxError::InvalidHandle(id))?;
        self.log.push(Call::Release(id));
        Ok(())
    }

    fn set_shader(&mut self, stage: ShaderStage, id: ShaderId) -> Result<(), GfxError> {
        match self.resources.get(id.0) {
            Some(Resource::Shader(s)) if *s == stage => {}
            _ => return Err(GfxError::InvalidHandle(id.into())),
        }
        match stage {
            ShaderStage::Vertex => self.bound.vs = Some(id),
            ShaderStage::Pixel => self.bound.ps = Some(id),
        }
        self.log.push(Call::SetShader { stage, id });
        Ok(())
    }

    fn set_vertex_buffer(&mut self, id: BufferId) -> Result<(), GfxError> {
        self.expect_kind(id, "vertex")?;
        self.bound.vertex = Some(id);
        self.log.push(Call::SetVertexBuffer(id));
        Ok(())
    }

    fn set_index_buffer(&mut self, id: BufferId) -> Result<(), GfxError> {
        self.expect_kind(id, "index")?;
        self.bound.index = Some(id);
        self.log.push(Call::SetIndexBuffer(id));
        Ok(())
    }

    fn set_constant_buffer(
        &mut self,
        stage: ShaderStage,
        slot: u32,
        id: BufferId,
    ) -> Result<(), GfxError> {
        self.expect_kind(id, "constant")?;
        self.log.push(Call::SetConstantBuffer { stage, slot, id });
        Ok(())
    }

    fn set_input_layout(&mut self, id: LayoutId) -> Result<(), GfxError> {
        self.exists(id)?;
        self.bound.layout = Some(id);
        self.log.push(Call::SetInputLayout(id));
        Ok(())
    }

    fn set_topology(&mut self, topology: Topology) {
        self.log.push(Call::SetTopology(topology));
    }

    fn set_texture(&mut self, slot: u32, id: TextureId) -> Result<(), GfxError> {
        self.exists(id)?;
        self.log.push(Call::SetTexture { slot, id });
        Ok(())
    }

    fn set_sampler(&mut self, slot: u32, id: SamplerId) -> Result<(), GfxError> {
        self.exists(id)?;
        self.log.push(Call::SetSampler { slot, id });
        Ok(())
    }

    fn draw_indexed(&mut self, count: u32, start: u32, base: i32) -> Result<(), GfxError> {
        let b = &self.bound;
        if b.vs.is_none() {
            return Err(GfxError::IncompleteState("vertex shader"));
        }
        if b.ps.is_none() {
            return Err(GfxError::IncompleteState("pixel shader"));
        }
        if b.vertex.is_none() {
            return Err(GfxError::IncompleteState("vertex buffer"));
        }
        if b.index.is_none() {
            return Err(GfxError::IncompleteState("index buffer"));
        }
        if b.layout.is_none() {
            return Err(GfxError::IncompleteState("input layout"));
        }
        self.log.push(Call::DrawIndexed { count, start, base });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(dev: &mut HeadlessDevice, bytes: &[u8]) -> BufferId {
        dev.create_buffer(&BufferDesc {
            label: "c",
            kind: BufferKind::Constant,
            contents: bytes,
        })
        .unwrap()
    }

    #[test]
    fn log_is_shared_between_clones() {
        let mut dev = HeadlessDevice::new();
        let log = dev.log();
        constant(&mut dev, &[0; 16]);
        assert_eq!(log.count(Call::is_create), 1);
    }

    #[test]
    fn released_handle_is_invalid() {
        let mut dev = HeadlessDevice::new();
        let id = constant(&mut dev, &[0; 16]);
        dev.release(id.into()).unwrap();
        assert!(matches!(dev.write_buffer(id, &[1; 16]), Err(GfxError::InvalidHandle(_))));
        assert!(dev.release(id.into()).is_err());
        assert_eq!(dev.live(), 0);
    }

    #[test]
    fn write_replaces_contents() {
        let mut dev = HeadlessDevice::new();
        let id = constant(&mut dev, &[0; 16]);
        dev.write_buffer(id, &[7; 16]).unwrap();
        assert_eq!(dev.buffer_data(id), Some(&[7u8; 16][..]));
    }

    #[test]
    fn oversized_constant_rejected() {
        let mut dev = HeadlessDevice::new();
        let err = dev
            .create_buffer(&BufferDesc {
                label: "big",
                kind: BufferKind::Constant,
                contents: &[0; MAX_CONSTANT_SIZE + 16],
            })
            .unwrap_err();
        assert!(matches!(err, GfxError::ConstantTooLarge { .. }));
    }

    #[test]
    fn draw_without_state_is_incomplete() {
        let mut dev = HeadlessDevice::new();
        let err = dev.draw_indexed(3, 0, 0).unwrap_err();
        assert!(matches!(err, GfxError::IncompleteState("vertex shader")));
        assert_eq!(dev.log().count(Call::is_draw), 0);
    }

    #[test]
    fn constant_buffer_cannot_be_bound_as_vertices() {
        let mut dev = HeadlessDevice::new();
        let id = constant(&mut dev, &[0; 16]);
        assert!(matches!(
            dev.set_vertex_buffer(id),
            Err(GfxError::WrongBufferKind(_, "vertex"))
        ));
    }
}
