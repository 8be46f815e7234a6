use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Vec2};

/// A point with color and texture coordinates.
///
/// `tex_coords` are in texels when the draw uses
/// [`CoordinateType::Pixels`](super::CoordinateType::Pixels), in `[0, 1]` otherwise.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec2,
    pub color: ColorRgba,
    pub tex_coords: Vec2,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec2, color: ColorRgba, tex_coords: Vec2) -> Self {
        Self { position, color, tex_coords }
    }

    /// White vertex without texture coordinates.
    #[inline]
    pub const fn at(position: Vec2) -> Self {
        Self::new(position, ColorRgba::white(), Vec2::zero())
    }

    #[inline]
    pub const fn colored(position: Vec2, color: ColorRgba) -> Self {
        Self::new(position, color, Vec2::zero())
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::at(Vec2::zero())
    }
}
