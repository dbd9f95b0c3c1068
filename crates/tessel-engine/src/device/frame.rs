/// One acquired swapchain image and the encoder recording into it.
///
/// Acquisition of the next image blocks while this is alive; hand it back
/// through [`Gpu::submit`](super::Gpu::submit) promptly.
pub struct GpuFrame {
    pub(crate) surface_texture: wgpu::SurfaceTexture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Records a pass that clears color to `color` and depth to 1.0.
    pub fn clear(&mut self, color: wgpu::Color, depth: Option<&wgpu::TextureView>) {
        let _ = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessel clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: depth.map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    pub fn target<'a>(&'a mut self, depth: Option<&'a wgpu::TextureView>) -> RenderTarget<'a> {
        RenderTarget {
            encoder: &mut self.encoder,
            color_view: &self.view,
            depth_view: depth,
        }
    }
}

/// Where a renderer records: the frame encoder plus color and depth views.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}
