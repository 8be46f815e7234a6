//! Coordinate and geometry types shared across the engine.
//!
//! Canonical CPU space:
//! - World units (logical pixels under the default view)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Pixel-space types (`IVec2`, `IRect`, `PixelSize`) address render target pixels.

mod color;
mod pixel;
mod rect;
mod vec2;

pub use color::ColorRgba;
pub use pixel::{IRect, IVec2, PixelSize};
pub use rect::Rect;
pub use vec2::Vec2;
