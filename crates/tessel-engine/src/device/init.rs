/// How [`Gpu`](super::Gpu) sets up the device and the window surface.
///
/// The default is an sRGB surface with vsync and a 32-bit float depth buffer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// `None` renders without depth testing.
    pub depth_format: Option<wgpu::TextureFormat>,
    pub present_mode: wgpu::PresentMode,
    pub prefer_srgb: bool,
    /// Ignored when the surface does not offer it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    /// Hint only.
    pub desired_maximum_frame_latency: u32,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
            present_mode: wgpu::PresentMode::Fifo,
            prefer_srgb: true,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}
