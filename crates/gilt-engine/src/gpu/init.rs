/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and paces presentation to the display.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface. A hint only.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// Per-target attachment settings.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TargetSettings {
    /// Allocate an 8-bit stencil attachment next to the color attachment.
    ///
    /// Without one, stencil modes and stencil clears are ignored.
    pub stencil: bool,

    /// Use an sRGB color format for offscreen targets. Windows follow
    /// [`GpuInit::prefer_srgb`] instead.
    pub srgb: bool,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self { stencil: true, srgb: false }
    }
}
