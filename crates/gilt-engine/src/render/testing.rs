//! In-memory backend used by render-target and vertex-buffer tests.

use crate::coords::{ColorRgba, IRect, PixelSize};
use crate::graphics::{BlendMode, PrimitiveType, StencilMode, StencilValue, Transform, Vertex};

use super::backend::{allocate_id, Backend, BackendState, DrawCall, VertexSource, VertexStorage};
use super::VertexBufferUsage;

#[derive(Debug)]
pub struct MemoryStorage {
    id: u64,
    vertices: Vec<Vertex>,
    pub usage: VertexBufferUsage,
}

impl MemoryStorage {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl VertexStorage for MemoryStorage {
    fn id(&self) -> u64 {
        self.id
    }

    fn capacity(&self) -> usize {
        self.vertices.len()
    }

    fn reallocate(&mut self, capacity: usize, usage: VertexBufferUsage) {
        self.vertices = vec![Vertex::default(); capacity];
        self.usage = usage;
    }

    fn write(&mut self, offset: usize, vertices: &[Vertex]) {
        self.vertices[offset..offset + vertices.len()].copy_from_slice(vertices);
    }

    fn copy_from(&mut self, source: &Self, count: usize) {
        self.vertices[..count].copy_from_slice(&source.vertices[..count]);
    }
}

/// A draw as the backend saw it, with its vertices copied out.
#[derive(Debug, Clone)]
pub struct RecordedDraw {
    pub primitive: PrimitiveType,
    pub vertices: Vec<Vertex>,
    pub storage: Option<u64>,
    pub blend_mode: BlendMode,
    pub stencil_mode: StencilMode,
    pub transform: Transform,
    pub projection: Transform,
    pub viewport: IRect,
    pub scissor: IRect,
}

#[derive(Debug, Clone)]
pub enum Event {
    Activate(bool),
    Clear(Option<ColorRgba>, Option<StencilValue>),
    Draw(RecordedDraw),
    Bind(Option<u64>),
    Restore(BackendState),
    Reset,
    Display,
}

pub struct RecordingBackend {
    pub size: PixelSize,
    pub activation_succeeds: bool,
    pub vertex_buffers: bool,
    pub events: Vec<Event>,
    state: BackendState,
}

impl RecordingBackend {
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            activation_succeeds: true,
            vertex_buffers: true,
            events: Vec::new(),
            state: BackendState::default(),
        }
    }

    pub fn draws(&self) -> Vec<&RecordedDraw> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Draw(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn clears(&self) -> impl Iterator<Item = (Option<ColorRgba>, Option<StencilValue>)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            Event::Clear(c, s) => Some((c, s)),
            _ => None,
        })
    }
}

impl Backend for RecordingBackend {
    type Storage = MemoryStorage;

    fn size(&self) -> PixelSize {
        self.size
    }

    fn is_srgb(&self) -> bool {
        false
    }

    fn activate(&mut self, active: bool) -> bool {
        if active && !self.activation_succeeds {
            return false;
        }
        self.events.push(Event::Activate(active));
        true
    }

    fn clear(&mut self, color: Option<ColorRgba>, stencil: Option<StencilValue>) {
        self.events.push(Event::Clear(color, stencil));
    }

    fn draw(&mut self, call: &DrawCall<'_, MemoryStorage>) {
        self.state.apply_draw(call);
        let (vertices, storage) = match call.source {
            VertexSource::Slice(v) => (v.to_vec(), None),
            VertexSource::Storage { storage, first, count } => {
                (storage.vertices()[first..first + count].to_vec(), Some(storage.id()))
            }
        };
        self.events.push(Event::Draw(RecordedDraw {
            primitive: call.primitive,
            vertices,
            storage,
            blend_mode: call.states.blend_mode,
            stencil_mode: call.states.stencil_mode,
            transform: call.states.transform,
            projection: call.projection,
            viewport: call.viewport,
            scissor: call.scissor,
        }));
    }

    fn vertex_buffers_available(&self) -> bool {
        self.vertex_buffers
    }

    fn create_storage(&mut self, capacity: usize, usage: VertexBufferUsage) -> Option<MemoryStorage> {
        if !self.vertex_buffers {
            return None;
        }
        Some(MemoryStorage { id: allocate_id(), vertices: vec![Vertex::default(); capacity], usage })
    }

    fn bind_storage(&mut self, storage: Option<&MemoryStorage>) {
        self.state.vertex_storage = storage.map(VertexStorage::id);
        self.events.push(Event::Bind(self.state.vertex_storage));
    }

    fn state(&self) -> BackendState {
        self.state
    }

    fn restore_state(&mut self, state: BackendState) {
        self.state = state;
        self.events.push(Event::Restore(state));
    }

    fn reset_state(&mut self) {
        self.state = BackendState::default();
        self.events.push(Event::Reset);
    }

    fn display(&mut self) {
        self.events.push(Event::Display);
    }
}
