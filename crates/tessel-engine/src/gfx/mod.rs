//! Device boundary.
//!
//! The core never talks to a graphics API directly. Everything it needs from
//! the GPU goes through the [`Device`] trait: resource creation, constant
//! uploads, pipeline-state binding and indexed draws, with the semantics of an
//! immediate-mode device context (bound state persists until rebound).
//!
//! Two implementations ship with the engine:
//! - [`WgpuDevice`]: records draws against wgpu resources and replays them into
//!   a render pass once per frame.
//! - [`HeadlessDevice`]: allocates handles without a GPU and logs every call;
//!   used by tests and tooling.

mod device;
mod error;
mod handle;
mod headless;
mod wgpu_device;

pub use device::{
    check_signature, AddressMode, BufferDesc, BufferKind, CompiledShader, Device, Filter,
    InputElement, SamplerDesc, ShaderBytecode, ShaderDesc, ShaderStage, TextureDesc, Topology,
    VertexFormat, MAX_CONSTANT_SIZE,
};
pub use error::GfxError;
pub use handle::{BufferId, LayoutId, ResourceId, SamplerId, ShaderId, TextureId};
pub use headless::{Call, CallLog, HeadlessDevice};
pub use wgpu_device::WgpuDevice;
