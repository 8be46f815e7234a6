use std::sync::atomic::{AtomicU64, Ordering};

use crate::coords::{ColorRgba, IRect, PixelSize};
use crate::graphics::{
    BlendMode, PrimitiveType, RenderStates, StencilMode, StencilValue, Transform, Vertex,
};

use super::VertexBufferUsage;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-unique identifier for targets and GPU resources.
pub(crate) fn allocate_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// GPU-side vertex storage owned by a [`VertexBuffer`](super::VertexBuffer).
///
/// Dropping the storage releases the GPU allocation.
pub trait VertexStorage {
    /// Identity used in [`BackendState`] snapshots.
    fn id(&self) -> u64;

    /// Number of vertices the allocation holds.
    fn capacity(&self) -> usize;

    /// Replaces the allocation with one of `capacity` vertices. Contents are undefined afterwards.
    fn reallocate(&mut self, capacity: usize, usage: VertexBufferUsage);

    /// Overwrites vertices starting at `offset`. The range fits in `capacity()`.
    fn write(&mut self, offset: usize, vertices: &[Vertex]);

    /// Copies the first `count` vertices of `source` to the start of `self`.
    fn copy_from(&mut self, source: &Self, count: usize);
}

/// Where the vertices of a draw come from.
#[derive(Debug)]
pub enum VertexSource<'a, S> {
    /// CPU-side vertices, uploaded for this draw.
    Slice(&'a [Vertex]),
    /// A range of a GPU vertex buffer.
    Storage { storage: &'a S, first: usize, count: usize },
}

/// A fully resolved draw handed to the backend.
#[derive(Debug)]
pub struct DrawCall<'a, S> {
    pub source: VertexSource<'a, S>,
    pub primitive: PrimitiveType,
    pub states: RenderStates<'a>,
    /// The current view transform (world → normalized device coordinates).
    pub projection: Transform,
    /// Pixel-space viewport resolved from the view.
    pub viewport: IRect,
    /// Pixel-space scissor resolved from the view.
    pub scissor: IRect,
}

impl<S> DrawCall<'_, S> {
    /// Model transform followed by the projection.
    #[inline]
    pub fn matrix(&self) -> Transform {
        self.states.transform.combined(&self.projection)
    }

    pub fn vertex_count(&self) -> usize {
        match self.source {
            VertexSource::Slice(v) => v.len(),
            VertexSource::Storage { count, .. } => count,
        }
    }
}

/// Snapshot of the raw state a backend last applied.
///
/// Render targets push these on a LIFO stack around foreign drawing code.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BackendState {
    pub blend_mode: BlendMode,
    pub stencil_mode: StencilMode,
    pub matrix: Transform,
    pub viewport: IRect,
    pub scissor: Option<IRect>,
    pub texture: Option<u64>,
    pub shader: Option<u64>,
    pub vertex_storage: Option<u64>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            blend_mode: BlendMode::ALPHA,
            stencil_mode: StencilMode::DEFAULT,
            matrix: Transform::IDENTITY,
            viewport: IRect::default(),
            scissor: None,
            texture: None,
            shader: None,
            vertex_storage: None,
        }
    }
}

impl BackendState {
    /// Records what `call` applies.
    pub fn apply_draw<S: VertexStorage>(&mut self, call: &DrawCall<'_, S>) {
        self.blend_mode = call.states.blend_mode;
        self.stencil_mode = call.states.stencil_mode;
        self.matrix = call.matrix();
        self.viewport = call.viewport;
        self.scissor = Some(call.scissor);
        self.texture = call.states.texture.map(|t| t.id());
        self.shader = call.states.shader.map(|s| s.id());
        self.vertex_storage = match call.source {
            VertexSource::Slice(_) => None,
            VertexSource::Storage { storage, .. } => Some(storage.id()),
        };
    }
}

/// The rasterizer a render target delegates to.
///
/// One backend drives one surface (window or offscreen texture). All methods
/// are synchronous; GPU work may complete later.
pub trait Backend {
    type Storage: VertexStorage;

    /// Current size of the drawable area in pixels.
    fn size(&self) -> PixelSize;

    /// True when the color attachment encodes sRGB.
    fn is_srgb(&self) -> bool;

    /// Makes the backend's context current (or not) on this thread.
    fn activate(&mut self, active: bool) -> bool;

    /// Clears the color buffer, the stencil buffer, or both.
    fn clear(&mut self, color: Option<ColorRgba>, stencil: Option<StencilValue>);

    fn draw(&mut self, call: &DrawCall<'_, Self::Storage>);

    /// Whether [`create_storage`](Backend::create_storage) can succeed at all.
    fn vertex_buffers_available(&self) -> bool {
        true
    }

    fn create_storage(&mut self, capacity: usize, usage: VertexBufferUsage) -> Option<Self::Storage>;

    /// Binds (or unbinds) storage for raw drawing outside the managed draw path.
    fn bind_storage(&mut self, storage: Option<&Self::Storage>);

    fn state(&self) -> BackendState;

    fn restore_state(&mut self, state: BackendState);

    /// Reinitializes only the state render targets depend on.
    fn reset_state(&mut self);

    /// Finishes the frame (present or submit).
    fn display(&mut self) {}
}
