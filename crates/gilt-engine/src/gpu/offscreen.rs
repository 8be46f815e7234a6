use anyhow::Result;

use crate::coords::{ColorRgba, PixelSize};
use crate::graphics::StencilValue;
use crate::render::{Backend, BackendState, DrawCall, RenderTarget, VertexBufferUsage};

use super::renderer::Attachments;
use super::texture::{create_color_texture, create_stencil_view};
use super::{GpuContext, TargetSettings, Texture, WgpuRenderer, WgpuStorage, STENCIL_FORMAT};

/// Backend rendering into an offscreen color texture.
pub struct TextureBackend {
    renderer: WgpuRenderer,
    color: Texture,
    stencil: Option<wgpu::TextureView>,
}

/// A render target whose result can be sampled as a [`Texture`].
pub type RenderTexture = RenderTarget<TextureBackend>;

impl TextureBackend {
    pub fn new(ctx: &GpuContext, size: PixelSize, settings: TargetSettings) -> Result<Self> {
        anyhow::ensure!(!size.is_empty(), "render texture has zero size");

        let format = if settings.srgb { wgpu::TextureFormat::Rgba8UnormSrgb } else { wgpu::TextureFormat::Rgba8Unorm };
        let texture = create_color_texture(&ctx.device, size, format, wgpu::TextureUsages::RENDER_ATTACHMENT);
        let color = Texture::from_parts(&ctx.device, texture, size, settings.srgb);
        let stencil = settings.stencil.then(|| create_stencil_view(&ctx.device, size));
        let renderer = WgpuRenderer::new(ctx, format, settings.stencil.then_some(STENCIL_FORMAT))?;

        Ok(Self { renderer, color, stencil })
    }

    #[inline]
    pub fn renderer(&self) -> &WgpuRenderer {
        &self.renderer
    }
}

impl RenderTexture {
    /// Creates an offscreen target of `size` pixels.
    pub fn create(ctx: &GpuContext, size: PixelSize, settings: TargetSettings) -> Result<Self> {
        Ok(RenderTarget::new(TextureBackend::new(ctx, size, settings)?))
    }

    /// The color attachment, usable as a texture in later draws.
    #[inline]
    pub fn texture(&self) -> &Texture {
        &self.backend().color
    }

    /// Sampling options for the color attachment.
    pub fn set_smooth(&mut self, smooth: bool) {
        self.backend_mut().color.set_smooth(smooth);
    }

    pub fn set_repeated(&mut self, repeated: bool) {
        self.backend_mut().color.set_repeated(repeated);
    }
}

impl Backend for TextureBackend {
    type Storage = WgpuStorage;

    fn size(&self) -> PixelSize {
        self.color.size()
    }

    fn is_srgb(&self) -> bool {
        self.color.is_srgb()
    }

    fn activate(&mut self, _active: bool) -> bool {
        true
    }

    fn clear(&mut self, color: Option<ColorRgba>, stencil: Option<StencilValue>) {
        let att = Attachments { color: self.color.view(), stencil: self.stencil.as_ref(), size: self.color.size() };
        self.renderer.clear(&att, color, stencil);
    }

    fn draw(&mut self, call: &DrawCall<'_, WgpuStorage>) {
        let att = Attachments { color: self.color.view(), stencil: self.stencil.as_ref(), size: self.color.size() };
        self.renderer.draw(&att, call);
    }

    fn create_storage(&mut self, capacity: usize, usage: VertexBufferUsage) -> Option<WgpuStorage> {
        Some(self.renderer.create_storage(capacity, usage))
    }

    fn bind_storage(&mut self, storage: Option<&WgpuStorage>) {
        self.renderer.bind_storage(storage);
    }

    fn state(&self) -> BackendState {
        self.renderer.state()
    }

    fn restore_state(&mut self, state: BackendState) {
        self.renderer.restore_state(state);
    }

    fn reset_state(&mut self) {
        self.renderer.reset_state();
    }

    /// Draws are already submitted; this flushes the queue.
    fn display(&mut self) {
        self.renderer.context().queue.submit(std::iter::empty());
    }
}
