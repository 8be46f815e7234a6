use crate::graphics::{PrimitiveType, RenderStates, Vertex};

use super::backend::VertexStorage;
use super::VertexBuffer;

/// Something that can receive draws.
///
/// Implementors provide the two primitive draw paths; every other shape
/// resolves to one of them with [`RenderStates::DEFAULT`] filled in.
pub trait DrawTarget {
    type Storage: VertexStorage;

    fn draw_vertices_with(&mut self, vertices: &[Vertex], primitive: PrimitiveType, states: &RenderStates<'_>);

    /// Draws `count` vertices of `buffer` starting at `first`, clamped to the buffer.
    fn draw_buffer_range_with(
        &mut self,
        buffer: &VertexBuffer<Self::Storage>,
        first: usize,
        count: usize,
        states: &RenderStates<'_>,
    );

    fn draw_vertices(&mut self, vertices: &[Vertex], primitive: PrimitiveType) {
        self.draw_vertices_with(vertices, primitive, &RenderStates::DEFAULT);
    }

    /// Draws `count` vertices of `vertices` starting at `first`.
    ///
    /// Out-of-range requests are clamped to the slice rather than panicking.
    fn draw_vertex_range_with(
        &mut self,
        vertices: &[Vertex],
        first: usize,
        count: usize,
        primitive: PrimitiveType,
        states: &RenderStates<'_>,
    ) {
        let first = first.min(vertices.len());
        let end = first + count.min(vertices.len() - first);
        self.draw_vertices_with(&vertices[first..end], primitive, states);
    }

    fn draw_vertex_range(&mut self, vertices: &[Vertex], first: usize, count: usize, primitive: PrimitiveType) {
        self.draw_vertex_range_with(vertices, first, count, primitive, &RenderStates::DEFAULT);
    }

    fn draw_buffer_range(&mut self, buffer: &VertexBuffer<Self::Storage>, first: usize, count: usize) {
        self.draw_buffer_range_with(buffer, first, count, &RenderStates::DEFAULT);
    }

    fn draw_buffer(&mut self, buffer: &VertexBuffer<Self::Storage>) {
        self.draw_buffer_with(buffer, &RenderStates::DEFAULT);
    }

    fn draw_buffer_with(&mut self, buffer: &VertexBuffer<Self::Storage>, states: &RenderStates<'_>) {
        self.draw_buffer_range_with(buffer, 0, buffer.vertex_count(), states);
    }

    /// Lets `drawable` issue its own draws on this target.
    fn draw<D: Drawable<Self> + ?Sized>(&mut self, drawable: &D) {
        drawable.draw(self, &RenderStates::DEFAULT);
    }

    fn draw_with<D: Drawable<Self> + ?Sized>(&mut self, drawable: &D, states: &RenderStates<'_>) {
        drawable.draw(self, states);
    }
}

/// An object that knows how to draw itself onto a target.
///
/// The target only sees the vertices and states the drawable hands back.
pub trait Drawable<T: DrawTarget + ?Sized> {
    fn draw(&self, target: &mut T, states: &RenderStates<'_>);
}

impl<T: DrawTarget + ?Sized, D: Drawable<T> + ?Sized> Drawable<T> for &D {
    fn draw(&self, target: &mut T, states: &RenderStates<'_>) {
        (**self).draw(target, states);
    }
}
