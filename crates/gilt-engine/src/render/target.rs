use crate::coords::{ColorRgba, IRect, IVec2, PixelSize, Rect, Vec2};
use crate::graphics::{PrimitiveType, RenderStates, StencilValue, Transform, Vertex, View};

use super::backend::{allocate_id, Backend, BackendState, DrawCall, VertexSource};
use super::{context, DrawTarget, VertexBuffer};

/// Inline draws up to this many vertices are pre-transformed on the CPU.
pub const VERTEX_CACHE_SIZE: usize = 4;

/// A surface that can be drawn to: a window or an offscreen texture.
///
/// Owns the current [`View`], the default view covering the whole target, and
/// a stack of saved backend states. Actual rasterization is delegated to `B`.
///
/// Drawing goes through the [`DrawTarget`] methods.
pub struct RenderTarget<B: Backend> {
    backend: B,
    id: u64,
    view: View,
    default_view: View,
    saved_states: Vec<BackendState>,
}

impl<B: Backend> RenderTarget<B> {
    pub fn new(backend: B) -> Self {
        let mut target = Self {
            backend,
            id: allocate_id(),
            view: View::default(),
            default_view: View::default(),
            saved_states: Vec::new(),
        };
        target.initialize();
        log::debug!("render target {} created ({:?})", target.id, target.size());
        target
    }

    /// Resets the default view to the full target and makes it current.
    pub fn initialize(&mut self) {
        let size = self.size();
        self.default_view = View::from_rect(Rect::new(0.0, 0.0, size.width as f32, size.height as f32));
        self.view = self.default_view;
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Raw backend access for drawing outside the managed path.
    ///
    /// Wrap such code in [`push_backend_state`](Self::push_backend_state) /
    /// [`pop_backend_state`](Self::pop_backend_state) or call
    /// [`reset_backend_state`](Self::reset_backend_state) afterwards.
    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn size(&self) -> PixelSize {
        self.backend.size()
    }

    #[inline]
    pub fn is_srgb(&self) -> bool {
        self.backend.is_srgb()
    }

    // ── views ─────────────────────────────────────────────────────────────

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    #[inline]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[inline]
    pub fn default_view(&self) -> &View {
        &self.default_view
    }

    /// Pixel rectangle `view` renders into on this target.
    pub fn viewport(&self, view: &View) -> IRect {
        self.resolve(view.viewport())
    }

    /// Pixel rectangle outside of which `view` discards fragments.
    pub fn scissor(&self, view: &View) -> IRect {
        self.resolve(view.scissor())
    }

    fn resolve(&self, normalized: Rect) -> IRect {
        let size = self.size();
        let (w, h) = (size.width as f32, size.height as f32);
        IRect::new(
            (w * normalized.origin.x).round() as i32,
            (h * normalized.origin.y).round() as i32,
            (w * normalized.size.x).round() as i32,
            (h * normalized.size.y).round() as i32,
        )
    }

    // ── coordinate mapping ────────────────────────────────────────────────

    /// Converts a target pixel to world coordinates through the current view.
    pub fn map_pixel_to_coords(&self, pixel: IVec2) -> Vec2 {
        self.map_pixel_to_coords_with(pixel, &self.view)
    }

    pub fn map_pixel_to_coords_with(&self, pixel: IVec2, view: &View) -> Vec2 {
        let vp = self.viewport(view);
        let normalized = Vec2::new(
            -1.0 + 2.0 * (pixel.x - vp.x) as f32 / vp.width as f32,
            1.0 - 2.0 * (pixel.y - vp.y) as f32 / vp.height as f32,
        );
        view.inverse_transform().transform_point(normalized)
    }

    /// Converts world coordinates to the nearest target pixel through the current view.
    pub fn map_coords_to_pixel(&self, point: Vec2) -> IVec2 {
        self.map_coords_to_pixel_with(point, &self.view)
    }

    pub fn map_coords_to_pixel_with(&self, point: Vec2, view: &View) -> IVec2 {
        let normalized = view.transform().transform_point(point);
        let vp = self.viewport(view);
        IVec2::new(
            ((normalized.x + 1.0) / 2.0 * vp.width as f32 + vp.x as f32).round() as i32,
            ((1.0 - normalized.y) / 2.0 * vp.height as f32 + vp.y as f32).round() as i32,
        )
    }

    // ── clearing ──────────────────────────────────────────────────────────

    /// Clears the color buffer.
    ///
    /// `ColorRgba::default()` is transparent; use [`clear_black`](Self::clear_black)
    /// for the usual opaque black.
    pub fn clear(&mut self, color: ColorRgba) {
        self.clear_buffers(Some(color), None);
    }

    pub fn clear_black(&mut self) {
        self.clear(ColorRgba::black());
    }

    /// Clears the stencil buffer only. The value is truncated to the buffer's bit depth.
    pub fn clear_stencil(&mut self, value: impl Into<StencilValue>) {
        self.clear_buffers(None, Some(value.into()));
    }

    /// Clears the color and stencil buffers.
    pub fn clear_with_stencil(&mut self, color: ColorRgba, value: impl Into<StencilValue>) {
        self.clear_buffers(Some(color), Some(value.into()));
    }

    fn clear_buffers(&mut self, color: Option<ColorRgba>, stencil: Option<StencilValue>) {
        if !self.set_active(true) {
            log::error!("render target {}: activation failed, clear skipped", self.id);
            return;
        }
        self.backend.clear(color, stencil);
    }

    // ── activation ────────────────────────────────────────────────────────

    /// Makes this target current on the calling thread (or releases it).
    ///
    /// Activating replaces whichever target was current on this thread.
    /// Deactivating a target that is not current does nothing and succeeds.
    pub fn set_active(&mut self, active: bool) -> bool {
        if active {
            if context::is_current(self.id) {
                return true;
            }
            if !self.backend.activate(true) {
                return false;
            }
            if let Some(previous) = context::make_current(self.id) {
                log::trace!("render target {previous} implicitly deactivated by {}", self.id);
            }
            true
        } else {
            if !context::is_current(self.id) {
                return true;
            }
            if !self.backend.activate(false) {
                return false;
            }
            context::release(self.id);
            true
        }
    }

    /// True when this target is current on the calling thread.
    #[inline]
    pub fn is_active(&self) -> bool {
        context::is_current(self.id)
    }

    // ── raw backend state ─────────────────────────────────────────────────

    /// Saves the full backend state, then resets it for managed drawing.
    ///
    /// Saves everything unconditionally, which makes it expensive. Pairs with
    /// [`pop_backend_state`](Self::pop_backend_state) in LIFO order.
    pub fn push_backend_state(&mut self) {
        if !self.set_active(true) {
            log::error!("render target {}: activation failed, state not pushed", self.id);
            return;
        }
        self.saved_states.push(self.backend.state());
        self.backend.reset_state();
    }

    /// Restores the state saved by the matching [`push_backend_state`](Self::push_backend_state).
    ///
    /// An unbalanced pop is ignored with a warning.
    pub fn pop_backend_state(&mut self) {
        if self.saved_states.is_empty() {
            log::warn!("render target {}: pop_backend_state without matching push", self.id);
            return;
        }
        if !self.set_active(true) {
            log::error!("render target {}: activation failed, state not popped", self.id);
            return;
        }
        if let Some(state) = self.saved_states.pop() {
            self.backend.restore_state(state);
        }
    }

    /// Reinitializes only the backend state managed drawing depends on.
    ///
    /// Cheaper than a push/pop pair; call it after foreign drawing code.
    pub fn reset_backend_state(&mut self) {
        if !self.set_active(true) {
            log::error!("render target {}: activation failed, state not reset", self.id);
            return;
        }
        self.backend.reset_state();
    }

    /// Depth of the saved-state stack.
    #[inline]
    pub fn saved_state_depth(&self) -> usize {
        self.saved_states.len()
    }

    /// Presents (window) or submits (offscreen) what was drawn.
    pub fn display(&mut self) {
        if self.set_active(true) {
            self.backend.display();
        }
    }

    fn submit(&mut self, source: VertexSource<'_, B::Storage>, primitive: PrimitiveType, states: RenderStates<'_>) {
        let call = DrawCall {
            source,
            primitive,
            states,
            projection: self.view.transform(),
            viewport: self.viewport(&self.view),
            scissor: self.scissor(&self.view),
        };
        self.backend.draw(&call);
    }
}

impl<B: Backend> DrawTarget for RenderTarget<B> {
    type Storage = B::Storage;

    fn draw_vertices_with(&mut self, vertices: &[Vertex], primitive: PrimitiveType, states: &RenderStates<'_>) {
        if vertices.is_empty() {
            return;
        }
        if !self.set_active(true) {
            log::error!("render target {}: activation failed, draw skipped", self.id);
            return;
        }

        if vertices.len() <= VERTEX_CACHE_SIZE {
            let mut cache = [Vertex::default(); VERTEX_CACHE_SIZE];
            for (cached, v) in cache.iter_mut().zip(vertices) {
                *cached = Vertex { position: states.transform.transform_point(v.position), ..*v };
            }
            let states = RenderStates { transform: Transform::IDENTITY, ..*states };
            self.submit(VertexSource::Slice(&cache[..vertices.len()]), primitive, states);
        } else {
            self.submit(VertexSource::Slice(vertices), primitive, *states);
        }
    }

    fn draw_buffer_range_with(
        &mut self,
        buffer: &VertexBuffer<B::Storage>,
        first: usize,
        count: usize,
        states: &RenderStates<'_>,
    ) {
        let Some(storage) = buffer.storage() else { return };
        let total = buffer.vertex_count();
        if first > total {
            return;
        }
        let count = count.min(total - first);
        if count == 0 {
            return;
        }
        if !self.set_active(true) {
            log::error!("render target {}: activation failed, draw skipped", self.id);
            return;
        }

        self.submit(
            VertexSource::Storage { storage, first, count },
            buffer.primitive_type(),
            *states,
        );
    }
}

impl<B: Backend> Drop for RenderTarget<B> {
    fn drop(&mut self) {
        if !self.saved_states.is_empty() {
            log::warn!(
                "render target {} dropped with {} unpopped backend state(s)",
                self.id,
                self.saved_states.len()
            );
        }
        context::release(self.id);
    }
}
