use std::collections::HashMap;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, IRect, PixelSize, Vec2};
use crate::graphics::{
    BlendEquation, BlendFactor, BlendMode, CoordinateType, PrimitiveType, StencilComparison, StencilMode,
    StencilUpdateOperation, StencilValue, Transform, Vertex, STENCIL_MAX,
};
use crate::render::{BackendState, DrawCall, VertexBufferUsage, VertexSource, VertexStorage};

use super::{GpuContext, Shader, Texture, WgpuStorage};

/// Stencil attachment format used by every target.
pub const STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Stencil8;

/// Color and stencil views a draw renders into.
pub(crate) struct Attachments<'a> {
    pub color: &'a wgpu::TextureView,
    pub stencil: Option<&'a wgpu::TextureView>,
    pub size: PixelSize,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniform {
    matrix: [f32; 16],
    tex_scale: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    blend: BlendMode,
    comparison: StencilComparison,
    update_operation: StencilUpdateOperation,
    mask: u32,
    stencil_only: bool,
    topology: wgpu::PrimitiveTopology,
    color_format: wgpu::TextureFormat,
    stencil_format: Option<wgpu::TextureFormat>,
    shader: Option<u64>,
}

/// Draws [`DrawCall`]s with wgpu.
///
/// One renderer serves one target. Every draw and clear is recorded into its
/// own encoder and submitted immediately, so the per-draw uniform and
/// streaming buffers can be rewritten between draws.
pub struct WgpuRenderer {
    ctx: GpuContext,
    color_format: wgpu::TextureFormat,
    stencil_format: Option<wgpu::TextureFormat>,

    texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sprite_shader: wgpu::ShaderModule,
    white: Texture,

    uniform: wgpu::Buffer,
    uniform_group: wgpu::BindGroup,

    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    stream_vbo: Option<wgpu::Buffer>,
    stream_capacity: usize,
    fan_ibo: Option<wgpu::Buffer>,
    fan_capacity: usize,

    state: BackendState,
    warned_no_stencil: bool,
}

impl WgpuRenderer {
    pub fn new(
        ctx: &GpuContext,
        color_format: wgpu::TextureFormat,
        stencil_format: Option<wgpu::TextureFormat>,
    ) -> Result<Self> {
        let device = &ctx.device;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gilt draw uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gilt texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gilt pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gilt sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gilt draw ubo"),
            size: std::mem::size_of::<DrawUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gilt draw uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: uniform.as_entire_binding() }],
        });

        Ok(Self {
            ctx: ctx.clone(),
            color_format,
            stencil_format,
            texture_layout,
            pipeline_layout,
            sprite_shader,
            white: Texture::white(ctx)?,
            uniform,
            uniform_group,
            pipelines: HashMap::new(),
            stream_vbo: None,
            stream_capacity: 0,
            fan_ibo: None,
            fan_capacity: 0,
            state: BackendState::default(),
            warned_no_stencil: false,
        })
    }

    #[inline]
    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    #[inline]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    #[inline]
    pub fn stencil_format(&self) -> Option<wgpu::TextureFormat> {
        self.stencil_format
    }

    /// Number of distinct pipelines built so far.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    // ── backend state ─────────────────────────────────────────────────────

    pub(crate) fn state(&self) -> BackendState {
        self.state
    }

    pub(crate) fn restore_state(&mut self, state: BackendState) {
        self.state = state;
    }

    pub(crate) fn reset_state(&mut self) {
        self.state = BackendState::default();
    }

    pub(crate) fn bind_storage(&mut self, storage: Option<&WgpuStorage>) {
        self.state.vertex_storage = storage.map(VertexStorage::id);
    }

    pub(crate) fn create_storage(&self, capacity: usize, usage: VertexBufferUsage) -> WgpuStorage {
        WgpuStorage::new(&self.ctx.device, &self.ctx.queue, capacity, usage)
    }

    // ── clear ─────────────────────────────────────────────────────────────

    pub(crate) fn clear(&mut self, att: &Attachments<'_>, color: Option<ColorRgba>, stencil: Option<StencilValue>) {
        let color_load = match color {
            Some(c) => wgpu::LoadOp::Clear(wgpu::Color {
                r: c.r as f64,
                g: c.g as f64,
                b: c.b as f64,
                a: c.a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        if stencil.is_some() && att.stencil.is_none() {
            self.warn_no_stencil();
        }
        let stencil_attachment = att.stencil.map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: None,
            stencil_ops: Some(wgpu::Operations {
                load: match stencil {
                    Some(v) => wgpu::LoadOp::Clear(v.get() & STENCIL_MAX),
                    None => wgpu::LoadOp::Load,
                },
                store: wgpu::StoreOp::Store,
            }),
        });

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("gilt clear encoder"),
        });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gilt clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: att.color,
                    resolve_target: None,
                    ops: wgpu::Operations { load: color_load, store: wgpu::StoreOp::Store },
                    depth_slice: None,
                })],
                depth_stencil_attachment: stencil_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    // ── draw ──────────────────────────────────────────────────────────────

    pub(crate) fn draw(&mut self, att: &Attachments<'_>, call: &DrawCall<'_, WgpuStorage>) {
        let count = call.vertex_count();
        if call.primitive.primitive_count(count) == 0 {
            log::trace!("{count} vertices form no complete {:?}, draw skipped", call.primitive);
            return;
        }
        let Some(scissor) = call.scissor.clamped_to(att.size) else { return };
        let Some((viewport, correction)) = fit_viewport(call.viewport, att.size) else { return };

        let stencil_mode = if att.stencil.is_some() {
            call.states.stencil_mode
        } else {
            if !call.states.stencil_mode.is_noop() {
                self.warn_no_stencil();
            }
            StencilMode::DEFAULT
        };

        self.state.apply_draw(call);

        let tex_scale = match (call.states.texture, call.states.coordinate_type) {
            (Some(t), CoordinateType::Pixels) => {
                let s = t.size();
                [1.0 / s.width as f32, 1.0 / s.height as f32]
            }
            _ => [1.0, 1.0],
        };
        let uniform = DrawUniform {
            matrix: call.matrix().combined(&correction).to_mat4(),
            tex_scale,
            _pad: [0.0; 2],
        };
        self.ctx.queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&uniform));

        let key = PipelineKey {
            blend: call.states.blend_mode,
            comparison: stencil_mode.comparison,
            update_operation: stencil_mode.update_operation,
            mask: stencil_mode.mask.get() & STENCIL_MAX,
            stencil_only: stencil_mode.stencil_only,
            topology: topology(call.primitive),
            color_format: self.color_format,
            stencil_format: self.stencil_format,
            shader: call.states.shader.map(Shader::id),
        };
        self.ensure_pipeline(key, call.states.shader);

        // Vertex range inside whichever buffer ends up bound.
        let (first, storage) = match call.source {
            VertexSource::Slice(vertices) => {
                self.upload_stream(vertices);
                (0, None)
            }
            VertexSource::Storage { storage, first, .. } => (first, Some(storage)),
        };
        let fan = call.primitive == PrimitiveType::TriangleFan;
        let index_count = if fan { self.upload_fan_indices(first, count) } else { 0 };

        let texture = call.states.texture.unwrap_or(&self.white);
        let texture_group = self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gilt texture bind group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(texture.view()) },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(texture.sampler()) },
            ],
        });

        let Some(pipeline) = self.pipelines.get(&key) else { return };
        let vbo = match storage {
            Some(s) => s.buffer(),
            None => match self.stream_vbo.as_ref() {
                Some(b) => b,
                None => return,
            },
        };

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("gilt draw encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gilt draw pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: att.color,
                    resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                    depth_slice: None,
                })],
                depth_stencil_attachment: att.stencil.map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: None,
                    stencil_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &self.uniform_group, &[]);
            rpass.set_bind_group(1, &texture_group, &[]);
            rpass.set_viewport(
                viewport.x as f32,
                viewport.y as f32,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );
            rpass.set_scissor_rect(scissor.x as u32, scissor.y as u32, scissor.width as u32, scissor.height as u32);
            if att.stencil.is_some() {
                rpass.set_stencil_reference(stencil_mode.reference.get() & STENCIL_MAX);
            }
            rpass.set_vertex_buffer(0, vbo.slice(..));

            match (fan, self.fan_ibo.as_ref()) {
                (true, Some(ibo)) => {
                    rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..index_count, 0, 0..1);
                }
                (true, None) => {}
                (false, _) => {
                    let first = first as u32;
                    rpass.draw(first..first + count as u32, 0..1);
                }
            }
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    fn warn_no_stencil(&mut self) {
        if !self.warned_no_stencil {
            log::warn!("stencil operation on a target without stencil attachment; ignored");
            self.warned_no_stencil = true;
        }
    }

    fn upload_stream(&mut self, vertices: &[Vertex]) {
        if vertices.len() > self.stream_capacity || self.stream_vbo.is_none() {
            let new_cap = vertices.len().next_power_of_two().max(64);
            self.stream_vbo = Some(self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("gilt stream vbo"),
                size: (new_cap * std::mem::size_of::<Vertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.stream_capacity = new_cap;
        }
        if let Some(vbo) = self.stream_vbo.as_ref() {
            self.ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));
        }
    }

    /// Writes triangle-list indices for a fan and returns how many there are.
    fn upload_fan_indices(&mut self, first: usize, count: usize) -> u32 {
        let indices = fan_indices(first as u32, count as u32);
        if indices.is_empty() {
            return 0;
        }
        if indices.len() > self.fan_capacity || self.fan_ibo.is_none() {
            let new_cap = indices.len().next_power_of_two().max(96);
            self.fan_ibo = Some(self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("gilt fan ibo"),
                size: (new_cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.fan_capacity = new_cap;
        }
        if let Some(ibo) = self.fan_ibo.as_ref() {
            self.ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&indices));
        }
        indices.len() as u32
    }

    fn ensure_pipeline(&mut self, key: PipelineKey, shader: Option<&Shader>) {
        if self.pipelines.contains_key(&key) {
            return;
        }

        let module = shader.map_or(&self.sprite_shader, Shader::module);
        let depth_stencil = key.stencil_format.map(|format| {
            let face = wgpu::StencilFaceState {
                // The GPU evaluates `reference op stored`.
                compare: compare_function(key.comparison.swapped()),
                fail_op: wgpu::StencilOperation::Keep,
                depth_fail_op: wgpu::StencilOperation::Keep,
                pass_op: stencil_operation(key.update_operation),
            };
            wgpu::DepthStencilState {
                format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState { front: face, back: face, read_mask: key.mask, write_mask: key.mask },
                bias: wgpu::DepthBiasState::default(),
            }
        });

        let pipeline = self.ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gilt pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.color_format,
                    blend: Some(blend_state(key.blend)),
                    write_mask: color_writes(key.stencil_only),
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: key.topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("pipeline #{} built for {:?}", self.pipelines.len() + 1, key.topology);
        self.pipelines.insert(key, pipeline);
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x2, // position
    1 => Float32x4, // color
    2 => Float32x2  // tex_coords
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

fn topology(primitive: PrimitiveType) -> wgpu::PrimitiveTopology {
    match primitive {
        PrimitiveType::Points => wgpu::PrimitiveTopology::PointList,
        PrimitiveType::Lines => wgpu::PrimitiveTopology::LineList,
        PrimitiveType::LineStrip => wgpu::PrimitiveTopology::LineStrip,
        PrimitiveType::Triangles | PrimitiveType::TriangleFan => wgpu::PrimitiveTopology::TriangleList,
        PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

/// `(first, first+i, first+i+1)` for every triangle of a fan.
fn fan_indices(first: u32, count: u32) -> Vec<u32> {
    (1..count.saturating_sub(1))
        .flat_map(|i| [first, first + i, first + i + 1])
        .collect()
}

/// Clamps `viewport` into the attachment.
///
/// Returns the clamped rectangle plus the NDC correction that keeps geometry
/// where the unclamped viewport would have put it.
fn fit_viewport(viewport: IRect, size: PixelSize) -> Option<(IRect, Transform)> {
    if viewport.is_empty() {
        return None;
    }
    let clamped = viewport.clamped_to(size)?;
    if clamped == viewport {
        return Some((viewport, Transform::IDENTITY));
    }

    let (vx, vy, vw, vh) = (viewport.x as f32, viewport.y as f32, viewport.width as f32, viewport.height as f32);
    let (cx, cy, cw, ch) = (clamped.x as f32, clamped.y as f32, clamped.width as f32, clamped.height as f32);
    let scale = Vec2::new(vw / cw, vh / ch);
    let offset = Vec2::new((2.0 * (vx - cx) + vw) / cw - 1.0, 1.0 - (2.0 * (vy - cy) + vh) / ch);
    let correction = Transform::new(scale.x, 0.0, offset.x, 0.0, scale.y, offset.y, 0.0, 0.0, 1.0);
    Some((clamped, correction))
}

fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    wgpu::BlendState {
        color: blend_component(mode.color_src_factor, mode.color_dst_factor, mode.color_equation),
        alpha: blend_component(mode.alpha_src_factor, mode.alpha_dst_factor, mode.alpha_equation),
    }
}

fn blend_component(src: BlendFactor, dst: BlendFactor, equation: BlendEquation) -> wgpu::BlendComponent {
    let operation = match equation {
        BlendEquation::Add => wgpu::BlendOperation::Add,
        BlendEquation::Subtract => wgpu::BlendOperation::Subtract,
        BlendEquation::ReverseSubtract => wgpu::BlendOperation::ReverseSubtract,
        BlendEquation::Min => wgpu::BlendOperation::Min,
        BlendEquation::Max => wgpu::BlendOperation::Max,
    };
    // wgpu rejects min/max with factors other than One.
    let (src, dst) = match equation {
        BlendEquation::Min | BlendEquation::Max => (BlendFactor::One, BlendFactor::One),
        _ => (src, dst),
    };
    wgpu::BlendComponent { src_factor: blend_factor(src), dst_factor: blend_factor(dst), operation }
}

fn blend_factor(factor: BlendFactor) -> wgpu::BlendFactor {
    match factor {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcColor => wgpu::BlendFactor::Src,
        BlendFactor::OneMinusSrcColor => wgpu::BlendFactor::OneMinusSrc,
        BlendFactor::DstColor => wgpu::BlendFactor::Dst,
        BlendFactor::OneMinusDstColor => wgpu::BlendFactor::OneMinusDst,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        BlendFactor::DstAlpha => wgpu::BlendFactor::DstAlpha,
        BlendFactor::OneMinusDstAlpha => wgpu::BlendFactor::OneMinusDstAlpha,
    }
}

fn compare_function(comparison: StencilComparison) -> wgpu::CompareFunction {
    match comparison {
        StencilComparison::Never => wgpu::CompareFunction::Never,
        StencilComparison::Less => wgpu::CompareFunction::Less,
        StencilComparison::LessEqual => wgpu::CompareFunction::LessEqual,
        StencilComparison::Greater => wgpu::CompareFunction::Greater,
        StencilComparison::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
        StencilComparison::Equal => wgpu::CompareFunction::Equal,
        StencilComparison::NotEqual => wgpu::CompareFunction::NotEqual,
        StencilComparison::Always => wgpu::CompareFunction::Always,
    }
}

fn color_writes(stencil_only: bool) -> wgpu::ColorWrites {
    if stencil_only { wgpu::ColorWrites::empty() } else { wgpu::ColorWrites::ALL }
}

fn stencil_operation(operation: StencilUpdateOperation) -> wgpu::StencilOperation {
    match operation {
        StencilUpdateOperation::Keep => wgpu::StencilOperation::Keep,
        StencilUpdateOperation::Zero => wgpu::StencilOperation::Zero,
        StencilUpdateOperation::Replace => wgpu::StencilOperation::Replace,
        StencilUpdateOperation::Increment => wgpu::StencilOperation::IncrementClamp,
        StencilUpdateOperation::Decrement => wgpu::StencilOperation::DecrementClamp,
        StencilUpdateOperation::Invert => wgpu::StencilOperation::Invert,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fans_become_triangle_lists() {
        assert_eq!(fan_indices(0, 5), vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
        assert_eq!(fan_indices(10, 3), vec![10, 11, 12]);
        assert!(fan_indices(0, 2).is_empty());
        assert_eq!(topology(PrimitiveType::TriangleFan), wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn inside_viewport_is_untouched() {
        let vp = IRect::new(10, 20, 100, 50);
        assert_eq!(fit_viewport(vp, PixelSize::new(200, 200)), Some((vp, Transform::IDENTITY)));
        assert_eq!(fit_viewport(IRect::new(0, 0, 0, 10), PixelSize::new(200, 200)), None);
    }

    #[test]
    fn clamped_viewport_keeps_pixel_placement() {
        // Right half of the viewport hangs off a 100x100 target.
        let vp = IRect::new(50, 0, 100, 100);
        let size = PixelSize::new(100, 100);
        let (clamped, correction) = fit_viewport(vp, size).unwrap();
        assert_eq!(clamped, IRect::new(50, 0, 50, 100));

        // NDC x = 0 sits at pixel 100 in the full viewport, the right edge of the clamped one.
        let p = correction.transform_point(Vec2::new(0.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
        let left = correction.transform_point(Vec2::new(-1.0, 1.0));
        assert!((left.x + 1.0).abs() < 1e-5 && (left.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn stencil_ops_saturate_on_gpu() {
        assert_eq!(stencil_operation(StencilUpdateOperation::Increment), wgpu::StencilOperation::IncrementClamp);
        assert_eq!(compare_function(StencilComparison::Less.swapped()), wgpu::CompareFunction::Greater);
    }

    #[test]
    fn stencil_only_masks_color_output() {
        assert_eq!(color_writes(true), wgpu::ColorWrites::empty());
        assert_eq!(color_writes(false), wgpu::ColorWrites::ALL);
    }

    #[test]
    fn min_max_force_unit_factors() {
        let c = blend_component(BlendFactor::SrcAlpha, BlendFactor::Zero, BlendEquation::Max);
        assert_eq!(c.src_factor, wgpu::BlendFactor::One);
        assert_eq!(c.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend_state(BlendMode::ALPHA).color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
    }
}
