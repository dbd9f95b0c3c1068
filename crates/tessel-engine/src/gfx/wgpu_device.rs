use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::num::NonZeroU64;
use std::rc::Rc;

use generational_arena::Arena;
use wgpu::util::DeviceExt;

use super::device::{
    check_signature, reflect_shader, AddressMode, BufferDesc, BufferKind, CompiledShader, Device,
    Filter, InputElement, SamplerDesc, ShaderBytecode, ShaderDesc, ShaderStage, TextureDesc,
    Topology, VertexFormat, MAX_CONSTANT_SIZE,
};
use super::error::GfxError;
use super::handle::{BufferId, LayoutId, ResourceId, SamplerId, ShaderId, TextureId};
use crate::device::RenderTarget;

/// Size of one uniform slot; also the dynamic-offset alignment.
const SLOT: u64 = MAX_CONSTANT_SIZE as u64;

/// [`Device`] backed by wgpu.
///
/// wgpu has no immediate-mode context, so draws are recorded with a snapshot
/// of the bound state and replayed by [`encode`](Self::encode) into a single
/// render pass. Constant buffers live on the CPU; every draw copies the bound
/// constants into a per-frame uniform arena and addresses them through
/// dynamic offsets, which keeps "write, then draw" semantics per draw.
///
/// Clones share the same state: the renderer owns one as its `Device`, the
/// host keeps another to encode frames.
#[derive(Clone)]
pub struct WgpuDevice {
    inner: Rc<RefCell<State>>,
}

impl WgpuDevice {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(State::new(device, queue, color_format, depth_format))),
        }
    }

    /// Draws recorded since the last [`encode`](Self::encode).
    pub fn pending_draws(&self) -> usize {
        self.inner.borrow().draws.len()
    }

    /// Replay recorded draws into `target`, loading its existing color and depth.
    pub fn encode(&self, target: &mut RenderTarget<'_>) {
        let mut guard = self.inner.borrow_mut();
        let state = &mut *guard;
        if state.draws.is_empty() {
            return;
        }
        state.prepare();
        state.replay(target);
        state.reset_frame();
    }

    /// Drop recorded draws without encoding them, e.g. when the frame was skipped.
    pub fn discard(&self) {
        let mut state = self.inner.borrow_mut();
        if !state.draws.is_empty() {
            log::debug!("discarding {} recorded draws", state.draws.len());
        }
        state.reset_frame();
    }
}

enum Resource {
    VertexBuffer { buffer: wgpu::Buffer, stride: u32 },
    IndexBuffer(wgpu::Buffer),
    Constants(Vec<u8>),
    Shader {
        stage: ShaderStage,
        module: wgpu::ShaderModule,
        entry_point: String,
    },
    Layout(Vec<wgpu::VertexAttribute>),
    Texture {
        _texture: wgpu::Texture,
        view: wgpu::TextureView,
    },
    Sampler(wgpu::Sampler),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    vs: ShaderId,
    ps: ShaderId,
    layout: LayoutId,
    stride: u32,
    topology: Topology,
}

type MaterialKey = (Option<TextureId>, Option<SamplerId>);

#[derive(Default, Clone, Copy)]
struct Bound {
    vs: Option<ShaderId>,
    ps: Option<ShaderId>,
    vertex: Option<BufferId>,
    index: Option<BufferId>,
    layout: Option<LayoutId>,
    topology: Topology,
    vs_constants: Option<BufferId>,
    ps_constants: Option<BufferId>,
    texture: Option<TextureId>,
    sampler: Option<SamplerId>,
}

struct DrawCmd {
    pipeline: PipelineKey,
    material: MaterialKey,
    vertex: BufferId,
    index: BufferId,
    vs_offset: u32,
    ps_offset: u32,
    count: u32,
    start: u32,
    base: i32,
}

/// Per-frame uniform storage addressed with dynamic offsets.
///
/// Slot 0 is always zeroed and backs stages with no bound constants.
struct UniformArena {
    staging: Vec<u8>,
    buffer: wgpu::Buffer,
    capacity: u64,
    bind_group: wgpu::BindGroup,
}

impl UniformArena {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        let capacity = SLOT * 64;
        let (buffer, bind_group) = Self::allocate(device, layout, capacity);
        Self {
            staging: vec![0; SLOT as usize],
            buffer,
            capacity,
            bind_group,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessel uniform arena"),
            size: capacity,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let slot = wgpu::BufferBinding {
            buffer: &buffer,
            offset: 0,
            size: NonZeroU64::new(SLOT),
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel constants"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(slot.clone()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(slot),
                },
            ],
        });
        (buffer, bind_group)
    }

    fn push(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.staging.len();
        self.staging.extend_from_slice(bytes);
        self.staging.resize(offset + SLOT as usize, 0);
        offset as u32
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, layout: &wgpu::BindGroupLayout) {
        let needed = self.staging.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            log::debug!("uniform arena grown to {} bytes", self.capacity);
            (self.buffer, self.bind_group) = Self::allocate(device, layout, self.capacity);
        }
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    fn reset(&mut self) {
        self.staging.truncate(SLOT as usize);
    }
}

struct State {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,

    resources: Arena<Resource>,
    bound: Bound,
    draws: Vec<DrawCmd>,

    constants_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniforms: UniformArena,

    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    materials: HashMap<MaterialKey, wgpu::BindGroup>,

    fallback_view: wgpu::TextureView,
    fallback_sampler: wgpu::Sampler,
}

impl State {
    fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(SLOT),
            },
            count: None,
        };
        let constants_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessel constants layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessel material layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessel pipeline layout"),
            bind_group_layouts: &[&constants_layout, &material_layout],
            immediate_size: 0,
        });

        let uniforms = UniformArena::new(&device, &constants_layout);

        let (_, fallback_view) = upload_texture(
            &device,
            &queue,
            &TextureDesc {
                label: "tessel fallback texture",
                width: 1,
                height: 1,
                pixels: &[255; 4],
            },
        );
        let fallback_sampler = make_sampler(&device, &SamplerDesc::default());

        Self {
            device,
            queue,
            color_format,
            depth_format,
            resources: Arena::new(),
            bound: Bound::default(),
            draws: Vec::new(),
            constants_layout,
            material_layout,
            pipeline_layout,
            uniforms,
            pipelines: HashMap::new(),
            materials: HashMap::new(),
            fallback_view,
            fallback_sampler,
        }
    }

    fn constants(&self, id: BufferId) -> Result<&[u8], GfxError> {
        match self.resources.get(id.0) {
            Some(Resource::Constants(bytes)) => Ok(bytes),
            Some(_) => Err(GfxError::WrongBufferKind(id, "constant")),
            None => Err(GfxError::InvalidHandle(id.into())),
        }
    }

    fn stride(&self, id: BufferId) -> Result<u32, GfxError> {
        match self.resources.get(id.0) {
            Some(Resource::VertexBuffer { stride, .. }) => Ok(*stride),
            Some(_) => Err(GfxError::WrongBufferKind(id, "vertex")),
            None => Err(GfxError::InvalidHandle(id.into())),
        }
    }

    // ── frame encoding ─────────────────────────────────────────────────────

    /// Upload uniforms and build every pipeline and material the recorded draws need.
    ///
    /// Draws whose resources were released since recording are dropped.
    fn prepare(&mut self) {
        self.uniforms
            .upload(&self.device, &self.queue, &self.constants_layout);

        let draws = std::mem::take(&mut self.draws);
        let mut kept = Vec::with_capacity(draws.len());
        for cmd in draws {
            let ready = self
                .ensure_pipeline(cmd.pipeline)
                .and_then(|_| self.ensure_material(cmd.material));
            match ready {
                Ok(()) => kept.push(cmd),
                Err(e) => log::warn!("dropping recorded draw: {e}"),
            }
        }
        self.draws = kept;
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) -> Result<(), GfxError> {
        if self.pipelines.contains_key(&key) {
            return Ok(());
        }
        let shader = |id: ShaderId| match self.resources.get(id.0) {
            Some(Resource::Shader { module, entry_point, .. }) => Ok((module, entry_point.as_str())),
            _ => Err(GfxError::InvalidHandle(id.into())),
        };
        let (vs_module, vs_entry) = shader(key.vs)?;
        let (ps_module, ps_entry) = shader(key.ps)?;
        let Some(Resource::Layout(attributes)) = self.resources.get(key.layout.0) else {
            return Err(GfxError::InvalidHandle(key.layout.into()));
        };

        let (topology, strip_index_format) = match key.topology {
            Topology::PointList => (wgpu::PrimitiveTopology::PointList, None),
            Topology::LineList => (wgpu::PrimitiveTopology::LineList, None),
            Topology::LineStrip => (wgpu::PrimitiveTopology::LineStrip, Some(wgpu::IndexFormat::Uint16)),
            Topology::TriangleList => (wgpu::PrimitiveTopology::TriangleList, None),
            Topology::TriangleStrip => (
                wgpu::PrimitiveTopology::TriangleStrip,
                Some(wgpu::IndexFormat::Uint16),
            ),
        };

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("tessel pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: vs_module,
                    entry_point: Some(vs_entry),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: key.stride as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes,
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: ps_module,
                    entry_point: Some(ps_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format,
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: self.depth_format.map(|format| wgpu::DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        log::debug!("pipeline created ({} cached)", self.pipelines.len() + 1);
        self.pipelines.insert(key, pipeline);
        Ok(())
    }

    fn ensure_material(&mut self, key: MaterialKey) -> Result<(), GfxError> {
        if self.materials.contains_key(&key) {
            return Ok(());
        }
        let view = match key.0 {
            Some(id) => match self.resources.get(id.0) {
                Some(Resource::Texture { view, .. }) => view,
                _ => return Err(GfxError::InvalidHandle(id.into())),
            },
            None => &self.fallback_view,
        };
        let sampler = match key.1 {
            Some(id) => match self.resources.get(id.0) {
                Some(Resource::Sampler(s)) => s,
                _ => return Err(GfxError::InvalidHandle(id.into())),
            },
            None => &self.fallback_sampler,
        };
        let group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel material"),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        self.materials.insert(key, group);
        Ok(())
    }

    fn replay(&self, target: &mut RenderTarget<'_>) {
        let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessel scene"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: target.depth_view.map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for cmd in &self.draws {
            let (
                Some(pipeline),
                Some(material),
                Some(Resource::VertexBuffer { buffer: vertices, .. }),
                Some(Resource::IndexBuffer(indices)),
            ) = (
                self.pipelines.get(&cmd.pipeline),
                self.materials.get(&cmd.material),
                self.resources.get(cmd.vertex.0),
                self.resources.get(cmd.index.0),
            )
            else {
                continue;
            };

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.uniforms.bind_group, &[cmd.vs_offset, cmd.ps_offset]);
            pass.set_bind_group(1, material, &[]);
            pass.set_vertex_buffer(0, vertices.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(cmd.start..cmd.start + cmd.count, cmd.base, 0..1);
        }
    }

    fn reset_frame(&mut self) {
        self.draws.clear();
        self.uniforms.reset();
    }

    fn forget(&mut self, id: ResourceId) {
        match id {
            ResourceId::ShaderId(s) => self.pipelines.retain(|k, _| k.vs != s && k.ps != s),
            ResourceId::LayoutId(l) => self.pipelines.retain(|k, _| k.layout != l),
            ResourceId::TextureId(t) => self.materials.retain(|k, _| k.0 != Some(t)),
            ResourceId::SamplerId(s) => self.materials.retain(|k, _| k.1 != Some(s)),
            ResourceId::BufferId(_) => {}
        }
    }
}

impl Device for WgpuDevice {
    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> Result<BufferId, GfxError> {
        if desc.contents.is_empty() {
            return Err(GfxError::EmptyBuffer(desc.kind.name()));
        }
        let mut state = self.inner.borrow_mut();
        let resource = match desc.kind {
            BufferKind::Vertex { stride } => Resource::VertexBuffer {
                buffer: state.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(desc.label),
                    contents: desc.contents,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                }),
                stride,
            },
            BufferKind::Index => {
                Resource::IndexBuffer(state.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(desc.label),
                    contents: desc.contents,
                    usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                }))
            }
            BufferKind::Constant => {
                if desc.contents.len() > MAX_CONSTANT_SIZE {
                    return Err(GfxError::ConstantTooLarge {
                        size: desc.contents.len(),
                        max: MAX_CONSTANT_SIZE,
                    });
                }
                Resource::Constants(desc.contents.to_vec())
            }
        };
        Ok(BufferId(state.resources.insert(resource)))
    }

    fn write_buffer(&mut self, id: BufferId, data: &[u8]) -> Result<(), GfxError> {
        let mut guard = self.inner.borrow_mut();
        let state = &mut *guard;
        match state.resources.get_mut(id.0) {
            Some(Resource::Constants(shadow)) => {
                if data.len() > MAX_CONSTANT_SIZE {
                    return Err(GfxError::ConstantTooLarge {
                        size: data.len(),
                        max: MAX_CONSTANT_SIZE,
                    });
                }
                shadow.clear();
                shadow.extend_from_slice(data);
            }
            Some(Resource::VertexBuffer { buffer, .. }) | Some(Resource::IndexBuffer(buffer)) => {
                let mut padded = data.to_vec();
                padded.resize(data.len().next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT as usize), 0);
                if padded.len() as u64 > buffer.size() {
                    *buffer = state.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("tessel resized buffer"),
                        contents: &padded,
                        usage: buffer.usage(),
                    });
                } else {
                    state.queue.write_buffer(buffer, 0, &padded);
                }
            }
            _ => return Err(GfxError::InvalidHandle(id.into())),
        }
        Ok(())
    }

    fn compile_shader(&mut self, desc: &ShaderDesc<'_>) -> Result<CompiledShader, GfxError> {
        let bytecode = reflect_shader(desc)?;
        let mut state = self.inner.borrow_mut();
        let module = state
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.label),
                source: wgpu::ShaderSource::Wgsl(Cow::Owned(desc.source.to_string())),
            });
        let id = ShaderId(state.resources.insert(Resource::Shader {
            stage: desc.stage,
            module,
            entry_point: desc.entry_point.to_string(),
        }));
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
        let attributes = elements
            .iter()
            .enumerate()
            .map(|(location, e)| wgpu::VertexAttribute {
                format: match e.format {
                    VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
                    VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
                    VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
                    VertexFormat::Unorm8x4 => wgpu::VertexFormat::Unorm8x4,
                },
                offset: e.offset as u64,
                shader_location: location as u32,
            })
            .collect();
        let mut state = self.inner.borrow_mut();
        Ok(LayoutId(state.resources.insert(Resource::Layout(attributes))))
    }

    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureId, GfxError> {
        desc.validate()?;
        let mut state = self.inner.borrow_mut();
        let (texture, view) = upload_texture(&state.device, &state.queue, desc);
        Ok(TextureId(state.resources.insert(Resource::Texture {
            _texture: texture,
            view,
        })))
    }

    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<SamplerId, GfxError> {
        let mut state = self.inner.borrow_mut();
        let sampler = make_sampler(&state.device, desc);
        Ok(SamplerId(state.resources.insert(Resource::Sampler(sampler))))
    }

    fn release(&mut self, id: ResourceId) -> Result<(), GfxError> {
        let mut state = self.inner.borrow_mut();
        state
            .resources
            .remove(id.index())
            .ok_or(GfxError::InvalidHandle(id))?;
        state.forget(id);
        Ok(())
    }

    fn set_shader(&mut self, stage: ShaderStage, id: ShaderId) -> Result<(), GfxError> {
        let mut state = self.inner.borrow_mut();
        match state.resources.get(id.0) {
            Some(Resource::Shader { stage: s, .. }) if *s == stage => {}
            _ => return Err(GfxError::InvalidHandle(id.into())),
        }
        match stage {
            ShaderStage::Vertex => state.bound.vs = Some(id),
            ShaderStage::Pixel => state.bound.ps = Some(id),
        }
        Ok(())
    }

    fn set_vertex_buffer(&mut self, id: BufferId) -> Result<(), GfxError> {
        let mut state = self.inner.borrow_mut();
        state.stride(id)?;
        state.bound.vertex = Some(id);
        Ok(())
    }

    fn set_index_buffer(&mut self, id: BufferId) -> Result<(), GfxError> {
        let mut state = self.inner.borrow_mut();
        match state.resources.get(id.0) {
            Some(Resource::IndexBuffer(_)) => {}
            Some(_) => return Err(GfxError::WrongBufferKind(id, "index")),
            None => return Err(GfxError::InvalidHandle(id.into())),
        }
        state.bound.index = Some(id);
        Ok(())
    }

    fn set_constant_buffer(
        &mut self,
        stage: ShaderStage,
        slot: u32,
        id: BufferId,
    ) -> Result<(), GfxError> {
        if slot != 0 {
            return Err(GfxError::UnsupportedSlot { kind: "constant buffer", slot });
        }
        let mut state = self.inner.borrow_mut();
        state.constants(id)?;
        match stage {
            ShaderStage::Vertex => state.bound.vs_constants = Some(id),
            ShaderStage::Pixel => state.bound.ps_constants = Some(id),
        }
        Ok(())
    }

    fn set_input_layout(&mut self, id: LayoutId) -> Result<(), GfxError> {
        let mut state = self.inner.borrow_mut();
        match state.resources.get(id.0) {
            Some(Resource::Layout(_)) => {}
            _ => return Err(GfxError::InvalidHandle(id.into())),
        }
        state.bound.layout = Some(id);
        Ok(())
    }

    fn set_topology(&mut self, topology: Topology) {
        self.inner.borrow_mut().bound.topology = topology;
    }

    fn set_texture(&mut self, slot: u32, id: TextureId) -> Result<(), GfxError> {
        if slot != 0 {
            return Err(GfxError::UnsupportedSlot { kind: "texture", slot });
        }
        let mut state = self.inner.borrow_mut();
        match state.resources.get(id.0) {
            Some(Resource::Texture { .. }) => {}
            _ => return Err(GfxError::InvalidHandle(id.into())),
        }
        state.bound.texture = Some(id);
        Ok(())
    }

    fn set_sampler(&mut self, slot: u32, id: SamplerId) -> Result<(), GfxError> {
        if slot != 0 {
            return Err(GfxError::UnsupportedSlot { kind: "sampler", slot });
        }
        let mut state = self.inner.borrow_mut();
        match state.resources.get(id.0) {
            Some(Resource::Sampler(_)) => {}
            _ => return Err(GfxError::InvalidHandle(id.into())),
        }
        state.bound.sampler = Some(id);
        Ok(())
    }

    fn draw_indexed(&mut self, count: u32, start: u32, base: i32) -> Result<(), GfxError> {
        let mut guard = self.inner.borrow_mut();
        let state = &mut *guard;
        let b = state.bound;

        let vs = b.vs.ok_or(GfxError::IncompleteState("vertex shader"))?;
        let ps = b.ps.ok_or(GfxError::IncompleteState("pixel shader"))?;
        let vertex = b.vertex.ok_or(GfxError::IncompleteState("vertex buffer"))?;
        let index = b.index.ok_or(GfxError::IncompleteState("index buffer"))?;
        let layout = b.layout.ok_or(GfxError::IncompleteState("input layout"))?;
        let stride = state.stride(vertex)?;

        let vs_offset = match b.vs_constants {
            Some(id) => {
                let bytes = state.constants(id)?.to_vec();
                state.uniforms.push(&bytes)
            }
            None => 0,
        };
        let ps_offset = match b.ps_constants {
            Some(id) => {
                let bytes = state.constants(id)?.to_vec();
                state.uniforms.push(&bytes)
            }
            None => 0,
        };

        state.draws.push(DrawCmd {
            pipeline: PipelineKey {
                vs,
                ps,
                layout,
                stride,
                topology: b.topology,
            },
            material: (b.texture, b.sampler),
            vertex,
            index,
            vs_offset,
            ps_offset,
            count,
            start,
            base,
        });
        Ok(())
    }
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    desc: &TextureDesc<'_>,
) -> (wgpu::Texture, wgpu::TextureView) {
    let size = wgpu::Extent3d {
        width: desc.width,
        height: desc.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(desc.label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        desc.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(desc.width * 4),
            rows_per_image: Some(desc.height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn make_sampler(device: &wgpu::Device, desc: &SamplerDesc) -> wgpu::Sampler {
    let filter = match desc.filter {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    };
    let address = match desc.address {
        AddressMode::Wrap => wgpu::AddressMode::Repeat,
        AddressMode::Clamp => wgpu::AddressMode::ClampToEdge,
    };
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("tessel sampler"),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    })
}
