use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::{ColorRgba, PixelSize};
use crate::graphics::StencilValue;
use crate::render::{Backend, BackendState, DrawCall, RenderTarget, VertexBufferUsage};

use super::renderer::Attachments;
use super::texture::create_stencil_view;
use super::{Gpu, GpuContext, GpuInit, SurfaceErrorAction, TargetSettings, WgpuRenderer, WgpuStorage, STENCIL_FORMAT};

/// Backend rendering into a window surface.
///
/// The surface frame is acquired by the first clear or draw after a
/// `display` and presented by the next `display`.
pub struct SurfaceBackend<'w> {
    gpu: Gpu<'w>,
    renderer: WgpuRenderer,
    settings: TargetSettings,
    stencil: Option<wgpu::TextureView>,
    frame: Option<(wgpu::SurfaceTexture, wgpu::TextureView)>,
    last_error: Option<SurfaceErrorAction>,
}

/// A render target bound to a window.
pub type RenderWindow<'w> = RenderTarget<SurfaceBackend<'w>>;

impl<'w> SurfaceBackend<'w> {
    pub fn new(window: &'w Window, init: &GpuInit, settings: TargetSettings) -> Result<Self> {
        let gpu = pollster::block_on(Gpu::new(window, init))?;
        let renderer = WgpuRenderer::new(
            gpu.context(),
            gpu.surface_format(),
            settings.stencil.then_some(STENCIL_FORMAT),
        )?;
        let stencil = settings
            .stencil
            .then(|| create_stencil_view(&gpu.context().device, pixel_size(gpu.size())));

        Ok(Self { gpu, renderer, settings, stencil, frame: None, last_error: None })
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    #[inline]
    pub fn renderer(&self) -> &WgpuRenderer {
        &self.renderer
    }

    /// Outcome of the last failed frame acquisition, cleared by the next success.
    #[inline]
    pub fn last_surface_error(&self) -> Option<SurfaceErrorAction> {
        self.last_error
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        // A stale frame has the old size.
        self.frame = None;
        self.gpu.resize(size);
        if self.settings.stencil && size.width > 0 && size.height > 0 {
            self.stencil = Some(create_stencil_view(&self.gpu.context().device, pixel_size(size)));
        }
    }

    fn acquire_frame(&mut self) -> bool {
        if self.frame.is_some() {
            return true;
        }
        if self.size().is_empty() {
            return false;
        }
        match self.gpu.acquire() {
            Ok(surface_texture) => {
                let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
                self.frame = Some((surface_texture, view));
                self.last_error = None;
                true
            }
            Err(err) => {
                let message = err.to_string();
                let action = self.gpu.handle_surface_error(err);
                match action {
                    SurfaceErrorAction::Fatal => log::error!("surface lost beyond recovery: {message}"),
                    _ => log::warn!("frame skipped: {message} ({action:?})"),
                }
                self.last_error = Some(action);
                false
            }
        }
    }
}

impl<'w> RenderWindow<'w> {
    /// Creates a render target drawing into `window`.
    pub fn create(window: &'w Window, init: &GpuInit, settings: TargetSettings) -> Result<Self> {
        Ok(RenderTarget::new(SurfaceBackend::new(window, init, settings)?))
    }

    /// Follows a window resize and resets the default view to the new size.
    ///
    /// The current view is left alone.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.backend_mut().resize(size);
        let view = *self.view();
        self.initialize();
        self.set_view(view);
    }

    #[inline]
    pub fn gpu_context(&self) -> &GpuContext {
        self.backend().gpu.context()
    }
}

impl Backend for SurfaceBackend<'_> {
    type Storage = WgpuStorage;

    fn size(&self) -> PixelSize {
        pixel_size(self.gpu.size())
    }

    fn is_srgb(&self) -> bool {
        self.gpu.surface_format().is_srgb()
    }

    fn activate(&mut self, _active: bool) -> bool {
        true
    }

    fn clear(&mut self, color: Option<ColorRgba>, stencil: Option<StencilValue>) {
        if !self.acquire_frame() {
            return;
        }
        let size = self.size();
        let Some((_, view)) = self.frame.as_ref() else { return };
        let att = Attachments { color: view, stencil: self.stencil.as_ref(), size };
        self.renderer.clear(&att, color, stencil);
    }

    fn draw(&mut self, call: &DrawCall<'_, WgpuStorage>) {
        if !self.acquire_frame() {
            return;
        }
        let size = self.size();
        let Some((_, view)) = self.frame.as_ref() else { return };
        let att = Attachments { color: view, stencil: self.stencil.as_ref(), size };
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

    /// Presents the current frame, if one was acquired.
    fn display(&mut self) {
        if let Some((surface_texture, view)) = self.frame.take() {
            drop(view);
            surface_texture.present();
        }
    }
}

fn pixel_size(size: PhysicalSize<u32>) -> PixelSize {
    PixelSize::new(size.width, size.height)
}
