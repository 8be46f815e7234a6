use anyhow::anyhow;

use crate::graphics::{PrimitiveType, RenderStates, Vertex};

use super::backend::{Backend, VertexStorage};
use super::{DrawTarget, Drawable, RenderTarget};

/// How often a vertex buffer's contents are expected to change.
///
/// A hint for the backend's allocation strategy; every usage supports every
/// operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum VertexBufferUsage {
    /// Rewritten every frame.
    #[default]
    Stream,
    /// Updated now and then.
    Dynamic,
    /// Written once, drawn many times.
    Static,
}

/// Vertices stored on the GPU, tagged with the primitive type they draw as.
///
/// Owns its storage exclusively; [`destroy`](Self::destroy) or dropping the
/// buffer releases it.
#[derive(Debug)]
pub struct VertexBuffer<S: VertexStorage> {
    storage: Option<S>,
    primitive: PrimitiveType,
    usage: VertexBufferUsage,
}

impl<S: VertexStorage> VertexBuffer<S> {
    /// A buffer without storage. Call [`create`](Self::create) before use.
    pub fn new(primitive: PrimitiveType, usage: VertexBufferUsage) -> Self {
        Self { storage: None, primitive, usage }
    }

    /// Creates a buffer with room for `capacity` vertices on `target`'s backend.
    pub fn with_capacity<B>(
        target: &mut RenderTarget<B>,
        capacity: usize,
        primitive: PrimitiveType,
        usage: VertexBufferUsage,
    ) -> anyhow::Result<Self>
    where
        B: Backend<Storage = S>,
    {
        let mut buffer = Self::new(primitive, usage);
        if !buffer.create(target, capacity) {
            return Err(anyhow!("failed to allocate vertex buffer of {capacity} vertices"));
        }
        Ok(buffer)
    }

    /// Whether `target`'s backend supports vertex buffers at all.
    pub fn is_available<B: Backend<Storage = S>>(target: &RenderTarget<B>) -> bool {
        target.backend().vertex_buffers_available()
    }

    /// (Re)creates the storage with room for `capacity` vertices.
    ///
    /// Previous contents are discarded. On failure the buffer keeps its old
    /// storage.
    pub fn create<B>(&mut self, target: &mut RenderTarget<B>, capacity: usize) -> bool
    where
        B: Backend<Storage = S>,
    {
        if !target.backend().vertex_buffers_available() {
            log::error!("vertex buffers are not available on this backend");
            return false;
        }
        let usage = self.usage;
        match target.backend_mut().create_storage(capacity, usage) {
            Some(storage) => {
                log::debug!("vertex buffer {} created ({capacity} vertices, {usage:?})", storage.id());
                self.storage = Some(storage);
                true
            }
            None => {
                log::error!("could not create vertex buffer of {capacity} vertices");
                false
            }
        }
    }

    /// Writes `vertices` starting at vertex `offset`.
    ///
    /// With `offset == 0` a larger slice grows the buffer to fit; a smaller one
    /// leaves the tail untouched. With a non-zero offset the range must fit in
    /// the current capacity, otherwise nothing is written and `false` is
    /// returned.
    pub fn update(&mut self, vertices: &[Vertex], offset: usize) -> bool {
        let usage = self.usage;
        let Some(storage) = self.storage.as_mut() else {
            log::warn!("vertex buffer update without storage");
            return false;
        };

        let count = vertices.len();
        let capacity = storage.capacity();
        if offset != 0 && offset.checked_add(count).is_none_or(|end| end > capacity) {
            log::warn!(
                "vertex buffer {}: update of {count} vertices at {offset} exceeds capacity {capacity}",
                storage.id()
            );
            return false;
        }

        if offset == 0 && count > capacity {
            storage.reallocate(count, usage);
        }
        if count > 0 {
            storage.write(offset, vertices);
        }
        true
    }

    /// Copies the whole contents of `other` into the start of this buffer.
    ///
    /// Fails when either buffer has no storage or `other` is larger than this one.
    pub fn update_from(&mut self, other: &Self) -> bool {
        let (Some(dst), Some(src)) = (self.storage.as_mut(), other.storage.as_ref()) else {
            return false;
        };
        if src.capacity() > dst.capacity() {
            log::warn!(
                "vertex buffer {}: cannot copy {} vertices into capacity {}",
                dst.id(),
                src.capacity(),
                dst.capacity()
            );
            return false;
        }
        let count = src.capacity();
        if count > 0 {
            dst.copy_from(src, count);
        }
        true
    }

    /// Capacity in vertices (0 without storage).
    pub fn vertex_count(&self) -> usize {
        self.storage.as_ref().map_or(0, VertexStorage::capacity)
    }

    #[inline]
    pub fn storage(&self) -> Option<&S> {
        self.storage.as_ref()
    }

    #[inline]
    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive
    }

    pub fn set_primitive_type(&mut self, primitive: PrimitiveType) {
        self.primitive = primitive;
    }

    #[inline]
    pub fn usage(&self) -> VertexBufferUsage {
        self.usage
    }

    /// Takes effect at the next allocation.
    pub fn set_usage(&mut self, usage: VertexBufferUsage) {
        self.usage = usage;
    }

    /// Releases the GPU storage. The buffer can be re-created afterwards.
    pub fn destroy(&mut self) {
        if let Some(storage) = self.storage.take() {
            log::debug!("vertex buffer {} destroyed", storage.id());
        }
    }

    /// Binds `buffer` (or unbinds with `None`) for raw drawing on `target`.
    ///
    /// Not needed for [`DrawTarget`] draws.
    pub fn bind<B>(target: &mut RenderTarget<B>, buffer: Option<&Self>)
    where
        B: Backend<Storage = S>,
    {
        if !target.set_active(true) {
            log::error!("render target {}: activation failed, buffer not bound", target.id());
            return;
        }
        target.backend_mut().bind_storage(buffer.and_then(|b| b.storage.as_ref()));
    }
}

impl<T: DrawTarget + ?Sized> Drawable<T> for VertexBuffer<T::Storage> {
    fn draw(&self, target: &mut T, states: &RenderStates<'_>) {
        target.draw_buffer_with(self, states);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{PixelSize, Vec2};
    use crate::render::testing::{MemoryStorage, RecordingBackend};

    fn target() -> RenderTarget<RecordingBackend> {
        RenderTarget::new(RecordingBackend::new(PixelSize::new(64, 64)))
    }

    fn verts(xs: &[f32]) -> Vec<Vertex> {
        xs.iter().map(|&x| Vertex::at(Vec2::new(x, 0.0))).collect()
    }

    fn xs(buffer: &VertexBuffer<MemoryStorage>) -> Vec<f32> {
        buffer.storage().map(|s| s.vertices().iter().map(|v| v.position.x).collect()).unwrap_or_default()
    }

    fn buffer_of_four(t: &mut RenderTarget<RecordingBackend>) -> VertexBuffer<MemoryStorage> {
        let mut b = VertexBuffer::with_capacity(t, 4, PrimitiveType::Points, VertexBufferUsage::Static).unwrap();
        assert!(b.update(&verts(&[1.0, 2.0, 3.0, 4.0]), 0));
        b
    }

    #[test]
    fn new_buffer_has_no_storage() {
        let mut b: VertexBuffer<MemoryStorage> = VertexBuffer::new(PrimitiveType::Lines, VertexBufferUsage::default());
        assert_eq!(b.vertex_count(), 0);
        assert_eq!(b.usage(), VertexBufferUsage::Stream);
        assert!(!b.update(&verts(&[1.0]), 0));
    }

    #[test]
    fn partial_update_at_start_keeps_tail() {
        let mut t = target();
        let mut b = buffer_of_four(&mut t);
        assert!(b.update(&verts(&[9.0, 9.0, 9.0]), 0));
        assert_eq!(xs(&b), vec![9.0, 9.0, 9.0, 4.0]);
    }

    #[test]
    fn out_of_range_offset_fails_without_change() {
        let mut t = target();
        let mut b = buffer_of_four(&mut t);
        assert!(!b.update(&verts(&[7.0, 7.0]), 3));
        assert_eq!(xs(&b), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(b.vertex_count(), 4);
    }

    #[test]
    fn offset_update_inside_capacity() {
        let mut t = target();
        let mut b = buffer_of_four(&mut t);
        assert!(b.update(&verts(&[7.0, 8.0]), 2));
        assert_eq!(xs(&b), vec![1.0, 2.0, 7.0, 8.0]);
    }

    #[test]
    fn larger_update_at_start_grows() {
        let mut t = target();
        let mut b = buffer_of_four(&mut t);
        assert!(b.update(&verts(&[5.0, 4.0, 3.0, 2.0, 1.0, 0.0]), 0));
        assert_eq!(b.vertex_count(), 6);
        assert_eq!(xs(&b), vec![5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn update_from_requires_fit() {
        let mut t = target();
        let small = buffer_of_four(&mut t);
        let mut big = VertexBuffer::with_capacity(&mut t, 6, PrimitiveType::Points, VertexBufferUsage::Dynamic).unwrap();
        assert!(big.update_from(&small));
        assert_eq!(&xs(&big)[..4], &[1.0, 2.0, 3.0, 4.0]);

        let mut smaller = small;
        assert!(!smaller.update_from(&big));
        assert_eq!(xs(&smaller), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn unavailable_backend_refuses_creation() {
        let mut backend = RecordingBackend::new(PixelSize::new(8, 8));
        backend.vertex_buffers = false;
        let mut t = RenderTarget::new(backend);
        assert!(!VertexBuffer::is_available(&t));
        assert!(VertexBuffer::with_capacity(&mut t, 4, PrimitiveType::Points, VertexBufferUsage::Stream).is_err());
    }

    #[test]
    fn destroy_releases_storage() {
        let mut t = target();
        let mut b = buffer_of_four(&mut t);
        b.destroy();
        assert!(b.storage().is_none());
        assert!(b.create(&mut t, 2));
        assert_eq!(b.vertex_count(), 2);
    }

    #[test]
    fn bind_and_unbind() {
        let mut t = target();
        let b = buffer_of_four(&mut t);
        let id = b.storage().map(VertexStorage::id);
        VertexBuffer::bind(&mut t, Some(&b));
        assert_eq!(t.backend().state().vertex_storage, id);
        VertexBuffer::bind(&mut t, None);
        assert_eq!(t.backend().state().vertex_storage, None);
    }

    #[test]
    fn draws_clamp_to_buffer() {
        let mut t = target();
        let mut b = buffer_of_four(&mut t);
        b.set_primitive_type(PrimitiveType::LineStrip);

        t.draw(&b);
        t.draw_buffer_range(&b, 2, 10);
        t.draw_buffer_range(&b, 5, 1);

        let draws = t.backend().draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].primitive, PrimitiveType::LineStrip);
        assert_eq!(draws[0].vertices.len(), 4);
        assert_eq!(draws[1].vertices.iter().map(|v| v.position.x).collect::<Vec<_>>(), vec![3.0, 4.0]);
        assert_eq!(draws[1].storage, b.storage().map(VertexStorage::id));
    }
}
