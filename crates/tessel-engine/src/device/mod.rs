//! wgpu bootstrap for one window.
//!
//! [`Gpu`] owns the instance, adapter, device, queue and surface plus a depth
//! buffer kept at surface size. Each frame is acquired as a [`GpuFrame`] and
//! lent to drawing code as a [`RenderTarget`].

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::{GpuFrame, RenderTarget};
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
