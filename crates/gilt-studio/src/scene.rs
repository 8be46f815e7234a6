use std::f32::consts::TAU;
use std::time::Instant;

use anyhow::Result;
use winit::keyboard::KeyCode;

use gilt_engine::coords::{ColorRgba, IVec2, PixelSize, Rect, Vec2};
use gilt_engine::gpu::{RenderTexture, RenderWindow, TargetSettings, WgpuStorage};
use gilt_engine::graphics::{
    BlendMode, CoordinateType, PrimitiveType, RenderStates, StencilComparison, StencilMode, StencilUpdateOperation,
    StencilValue, Transform, Vertex,
};
use gilt_engine::render::{DrawTarget, VertexBuffer, VertexBufferUsage};

const BACKGROUND: ColorRgba = ColorRgba::new(0.07, 0.08, 0.10, 1.0);
const BADGE_SIZE: u32 = 128;

/// Everything the studio window shows.
pub struct Scene {
    star: VertexBuffer<WgpuStorage>,
    badge: RenderTexture,
    clock: Instant,
    pointer: IVec2,
}

impl Scene {
    pub fn new(target: &mut RenderWindow<'_>) -> Result<Self> {
        let mut star =
            VertexBuffer::with_capacity(target, 11, PrimitiveType::LineStrip, VertexBufferUsage::Static)?;
        if !star.update(&star_outline(Vec2::zero(), 60.0, 25.0), 0) {
            log::warn!("star outline upload failed; the star will not be drawn");
        }

        let ctx = target.gpu_context().clone();
        let mut badge = RenderTexture::create(
            &ctx,
            PixelSize::new(BADGE_SIZE, BADGE_SIZE),
            TargetSettings { stencil: false, srgb: target.is_srgb() },
        )?;
        badge.set_smooth(true);

        log::info!("scene ready: arrows pan, wheel zooms, Q/E rotate, R resets");
        Ok(Self { star, badge, clock: Instant::now(), pointer: IVec2::default() })
    }

    pub fn pointer_moved(&mut self, pixel: IVec2) {
        self.pointer = pixel;
    }

    pub fn wheel(&mut self, target: &mut RenderWindow<'_>, lines: f32) {
        let mut view = *target.view();
        view.zoom(0.9f32.powf(lines));
        target.set_view(view);
    }

    pub fn key(&mut self, target: &mut RenderWindow<'_>, code: KeyCode) {
        let mut view = *target.view();
        let step = view.size().x * 0.05;
        match code {
            KeyCode::ArrowLeft => view.move_by(Vec2::new(-step, 0.0)),
            KeyCode::ArrowRight => view.move_by(Vec2::new(step, 0.0)),
            KeyCode::ArrowUp => view.move_by(Vec2::new(0.0, -step)),
            KeyCode::ArrowDown => view.move_by(Vec2::new(0.0, step)),
            KeyCode::KeyQ => view.rotate(-5.0),
            KeyCode::KeyE => view.rotate(5.0),
            KeyCode::KeyR => view = *target.default_view(),
            _ => return,
        }
        target.set_view(view);
    }

    pub fn render(&mut self, target: &mut RenderWindow<'_>) {
        let t = self.clock.elapsed().as_secs_f32();
        self.render_badge(t);

        target.clear_with_stencil(BACKGROUND, 0u32);

        let area = target.default_view().size();
        let center = area * 0.5;
        let radius = area.x.min(area.y) * 0.35;

        // Punch a disc into the stencil buffer, then fill only inside it.
        let disc = fan(center, radius, 64, ColorRgba::white());
        let write_disc = StencilMode::new(
            StencilComparison::Always,
            StencilUpdateOperation::Replace,
            StencilValue::new(1),
            StencilValue::ALL,
            true,
        );
        target.draw_vertices_with(&disc, PrimitiveType::TriangleFan, &RenderStates::from_stencil_mode(write_disc));

        let inside_disc = StencilMode { comparison: StencilComparison::Equal, reference: StencilValue::new(1), ..StencilMode::DEFAULT };
        let stripes = stripes(area, 24, t * 40.0);
        target.draw_vertices_with(&stripes, PrimitiveType::Triangles, &RenderStates::from_stencil_mode(inside_disc));

        // Spinning star from the static buffer.
        let spin = Transform::from_rotation(t * 30.0).translated(center);
        target.draw_buffer_with(&self.star, &RenderStates::from_transform(spin));

        // Additive orbiting dots.
        let dots: Vec<Vertex> = (0..12)
            .map(|i| {
                let a = t + i as f32 * TAU / 12.0;
                Vertex::colored(center + Vec2::new(a.cos(), a.sin()) * (radius * 1.15), ColorRgba::new(1.0, 0.8, 0.3, 1.0))
            })
            .collect();
        target.draw_vertices_with(&dots, PrimitiveType::Points, &RenderStates::from_blend_mode(BlendMode::ADD));

        let size = target.size();
        let screen = Rect::new(0.0, 0.0, size.width as f32, size.height as f32);

        // Pointer marker, in world coordinates of the current view.
        if screen.contains(Vec2::new(self.pointer.x as f32, self.pointer.y as f32)) {
            let at = target.map_pixel_to_coords(self.pointer);
            target.draw_vertices(&square(at, 6.0, ColorRgba::new(0.3, 0.9, 0.5, 1.0)), PrimitiveType::TriangleStrip);
        }

        // Offscreen badge pinned to the top-left corner regardless of the view.
        let badge = Rect::new(16.0, 16.0, BADGE_SIZE as f32, BADGE_SIZE as f32);
        if badge.intersect(screen).is_some() {
            let view = *target.view();
            target.set_view(*target.default_view());
            let mut states = RenderStates::from_texture(self.badge.texture());
            states.coordinate_type = CoordinateType::Normalized;
            target.draw_vertices_with(&textured_quad(badge), PrimitiveType::TriangleStrip, &states);
            target.set_view(view);
        }

        target.display();
    }

    fn render_badge(&mut self, t: f32) {
        let badge = &mut self.badge;
        badge.clear(ColorRgba::transparent());
        let c = Vec2::new(BADGE_SIZE as f32 * 0.5, BADGE_SIZE as f32 * 0.5);
        let pulse = 0.5 + 0.5 * (t * 2.0).sin();
        let spin = RenderStates::from_transform(Transform::IDENTITY.rotated_about(t * 45.0, c));
        let hexagon = fan(c, 40.0 + 16.0 * pulse, 6, ColorRgba::new(0.4, 0.6, 1.0, 0.9));
        badge.draw_vertices_with(&hexagon, PrimitiveType::TriangleFan, &spin);
        badge.display();
    }
}

fn fan(center: Vec2, radius: f32, segments: usize, color: ColorRgba) -> Vec<Vertex> {
    std::iter::once(Vertex::colored(center, color))
        .chain((0..=segments).map(|i| {
            let a = i as f32 * TAU / segments as f32;
            Vertex::colored(center + Vec2::new(a.cos(), a.sin()) * radius, color)
        }))
        .collect()
}

fn stripes(area: Vec2, count: usize, shift: f32) -> Vec<Vertex> {
    let width = area.x / count as f32;
    let mut out = Vec::with_capacity(count * 6);
    for i in 0..count {
        let hue = i as f32 / count as f32;
        let color = ColorRgba::new(0.3 + 0.7 * hue, 0.3, 1.0 - 0.7 * hue, 1.0);
        let x0 = (i as f32 * width + shift).rem_euclid(area.x + width) - width;
        let (x1, skew) = (x0 + width * 0.5, area.y * 0.25);
        let a = Vertex::colored(Vec2::new(x0, 0.0), color);
        let b = Vertex::colored(Vec2::new(x1, 0.0), color);
        let c = Vertex::colored(Vec2::new(x1 + skew, area.y), color);
        let d = Vertex::colored(Vec2::new(x0 + skew, area.y), color);
        out.extend([a, b, c, a, c, d]);
    }
    out
}

fn star_outline(center: Vec2, outer: f32, inner: f32) -> Vec<Vertex> {
    (0..=10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f32 * TAU / 10.0 - TAU / 4.0;
            Vertex::colored(center + Vec2::new(a.cos(), a.sin()) * r, ColorRgba::white())
        })
        .collect()
}

fn square(center: Vec2, half: f32, color: ColorRgba) -> [Vertex; 4] {
    [
        Vertex::colored(center + Vec2::new(-half, -half), color),
        Vertex::colored(center + Vec2::new(half, -half), color),
        Vertex::colored(center + Vec2::new(-half, half), color),
        Vertex::colored(center + Vec2::new(half, half), color),
    ]
}

fn textured_quad(rect: Rect) -> [Vertex; 4] {
    let [tl, tr, br, bl] = rect.corners();
    let white = ColorRgba::white();
    [
        Vertex::new(tl, white, Vec2::new(0.0, 0.0)),
        Vertex::new(tr, white, Vec2::new(1.0, 0.0)),
        Vertex::new(bl, white, Vec2::new(0.0, 1.0)),
        Vertex::new(br, white, Vec2::new(1.0, 1.0)),
    ]
}
