use crate::render::allocate_id;

use super::GpuContext;

/// A WGSL program replacing the built-in sprite shader.
///
/// The module must export `vs_main` and `fs_main` and use the built-in bind
/// layout: group 0 binding 0 is the per-draw uniform (`mat4x4<f32>` followed by
/// a `vec2<f32>` texture coordinate scale), group 1 holds the texture (binding
/// 0) and its sampler (binding 1). Vertex attributes are position (location
/// 0), color (location 1) and texture coordinates (location 2).
#[derive(Debug)]
pub struct Shader {
    id: u64,
    module: wgpu::ShaderModule,
}

impl Shader {
    pub fn from_wgsl(ctx: &GpuContext, label: &str, source: &str) -> Self {
        let module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let id = allocate_id();
        log::debug!("shader {id} ({label}) created");
        Self { id, module }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub(crate) fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }
}
