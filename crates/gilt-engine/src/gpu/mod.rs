//! wgpu backend.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (headless or bound to a window)
//! - textures and shaders that render states can reference
//! - mapping draw calls onto pipelines, bind groups and render passes
//! - the concrete render targets: [`RenderTexture`] and [`RenderWindow`]

mod context;
mod init;
mod offscreen;
mod renderer;
mod shader;
mod storage;
mod surface;
mod texture;
mod window;

pub use context::GpuContext;
pub use init::{GpuInit, TargetSettings};
pub use offscreen::{RenderTexture, TextureBackend};
pub use renderer::{WgpuRenderer, STENCIL_FORMAT};
pub use shader::Shader;
pub use storage::WgpuStorage;
pub use surface::{Gpu, SurfaceErrorAction};
pub use texture::Texture;
pub use window::{RenderWindow, SurfaceBackend};
