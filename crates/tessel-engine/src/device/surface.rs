use winit::dpi::PhysicalSize;

/// What the host does after failing to acquire a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface reconfigured; the next frame can proceed.
    Reconfigured,
    SkipFrame,
    /// Out of memory. The host exits.
    Fatal,
}

impl From<&wgpu::SurfaceError> for SurfaceErrorAction {
    fn from(err: &wgpu::SurfaceError) -> Self {
        use wgpu::SurfaceError as E;
        match err {
            E::Lost | E::Outdated => Self::Reconfigured,
            E::OutOfMemory => Self::Fatal,
            E::Timeout | E::Other => Self::SkipFrame,
        }
    }
}

const SRGB_FORMATS: [wgpu::TextureFormat; 2] = [
    wgpu::TextureFormat::Bgra8UnormSrgb,
    wgpu::TextureFormat::Rgba8UnormSrgb,
];

/// First sRGB format the surface offers when `prefer_srgb`, else its first format.
pub(crate) fn pick_format(
    offered: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let srgb = SRGB_FORMATS.into_iter().find(|f| offered.contains(f));
    if prefer_srgb && srgb.is_some() {
        srgb
    } else {
        offered.first().copied()
    }
}

pub(crate) fn pick_alpha_mode(
    offered: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    match requested {
        Some(mode) if offered.contains(&mode) => mode,
        _ => offered.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
    }
}

/// Depth attachment that follows the surface size.
pub(crate) struct DepthTarget {
    pub(crate) format: wgpu::TextureFormat,
    pub(crate) view: wgpu::TextureView,
}

impl DepthTarget {
    pub(crate) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
    ) -> Self {
        let view = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("tessel depth"),
                size: wgpu::Extent3d {
                    width: size.width.max(1),
                    height: size.height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self { format, view }
    }

    pub(crate) fn resized(&self, device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        Self::new(device, self.format, size)
    }
}
