//! Render targets and the draw path.
//!
//! A [`RenderTarget`] resolves its current [`View`](crate::graphics::View)
//! into pixel rectangles, applies [`RenderStates`](crate::graphics::RenderStates)
//! and forwards each draw to its [`Backend`]. Convention:
//! - World coordinates are in pixels of the default view (top-left origin, +Y down).
//! - Normalized device coordinates are +Y up.

mod backend;
mod context;
mod drawable;
mod target;
mod vertex_buffer;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) use backend::allocate_id;
pub use backend::{Backend, BackendState, DrawCall, VertexSource, VertexStorage};
pub use drawable::{DrawTarget, Drawable};
pub use target::{RenderTarget, VERTEX_CACHE_SIZE};
pub use vertex_buffer::{VertexBuffer, VertexBufferUsage};
