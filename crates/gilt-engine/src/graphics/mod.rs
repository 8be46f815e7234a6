//! Value types describing what a draw call looks like: transforms, blending,
//! stencil rules, vertices, topology and the view it is seen through.
//!
//! Nothing here touches the GPU; the types are consumed by `render` and
//! mapped onto backend state by `gpu`.

mod blend;
mod primitive;
mod states;
mod stencil;
mod transform;
mod vertex;
mod view;

pub use blend::{BlendEquation, BlendFactor, BlendMode};
pub use primitive::PrimitiveType;
pub use states::{CoordinateType, RenderStates};
pub use stencil::{
    StencilComparison, StencilMode, StencilUpdateOperation, StencilValue, STENCIL_MAX,
};
pub use transform::Transform;
pub use vertex::Vertex;
pub use view::View;
