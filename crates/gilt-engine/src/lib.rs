//! Gilt engine crate.
//!
//! A 2D drawing core: affine transforms, blend/stencil/texture state bundles,
//! views, render targets with a pluggable backend, and a wgpu backend that
//! renders to windows and offscreen textures.

pub mod coords;
pub mod gpu;
pub mod graphics;
pub mod logging;
pub mod render;
