use crate::coords::{Rect, Vec2};

use super::Transform;

/// 2D camera: which world rectangle is shown, and where on the target.
///
/// `viewport` and `scissor` are normalized to the target size, so `(0, 0, 1, 1)`
/// covers the whole target whatever its pixel dimensions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct View {
    center: Vec2,
    size: Vec2,
    rotation: f32,
    viewport: Rect,
    scissor: Rect,
}

impl Default for View {
    fn default() -> Self {
        Self::from_rect(Rect::new(0.0, 0.0, 1000.0, 1000.0))
    }
}

impl View {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
            viewport: Rect::UNIT,
            scissor: Rect::UNIT,
        }
    }

    /// View showing exactly `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.center(), rect.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Rotation in degrees, in `[0, 360)`.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    #[inline]
    pub fn scissor(&self) -> Rect {
        self.scissor
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees.rem_euclid(360.0);
    }

    /// Sets the target area this view renders into, as a fraction of the target.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Sets the normalized area outside of which fragments are discarded.
    pub fn set_scissor(&mut self, scissor: Rect) {
        debug_assert!(
            scissor.origin.x >= 0.0 && scissor.origin.y >= 0.0 && scissor.max().x <= 1.0 && scissor.max().y <= 1.0,
            "scissor must lie within the normalized target area"
        );
        self.scissor = scissor;
    }

    /// Shows `rect`, clearing rotation. Viewport and scissor are kept.
    pub fn reset(&mut self, rect: Rect) {
        self.center = rect.center();
        self.size = rect.size;
        self.rotation = 0.0;
    }

    pub fn move_by(&mut self, offset: Vec2) {
        self.center += offset;
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Scales the visible area; factors above 1 show more of the world.
    pub fn zoom(&mut self, factor: f32) {
        self.size = self.size * factor;
    }

    /// World coordinates → normalized device coordinates (`[-1, 1]`, +Y up).
    pub fn transform(&self) -> Transform {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let Vec2 { x: cx, y: cy } = self.center;

        // Rotation about the center, folded into the projection.
        let tx = -cx * cos - cy * sin + cx;
        let ty = cx * sin - cy * cos + cy;

        let a = 2.0 / self.size.x;
        let b = -2.0 / self.size.y;
        let c = -a * cx;
        let d = -b * cy;

        Transform::new(
            a * cos, a * sin, a * tx + c,
            -b * sin, b * cos, b * ty + d,
            0.0, 0.0, 1.0,
        )
    }

    /// Normalized device coordinates → world coordinates.
    pub fn inverse_transform(&self) -> Transform {
        self.transform().inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() <= EPS && (a.y - b.y).abs() <= EPS
    }

    #[test]
    fn from_rect_maps_corners_to_ndc() {
        let v = View::from_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
        let t = v.transform();
        assert!(close(t.transform_point(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0)));
        assert!(close(t.transform_point(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0)));
        assert!(close(t.transform_point(Vec2::new(400.0, 300.0)), Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn inverse_transform_round_trips() {
        let mut v = View::new(Vec2::new(50.0, -20.0), Vec2::new(300.0, 200.0));
        v.rotate(33.0);
        let p = Vec2::new(12.0, 7.0);
        let back = v.inverse_transform().transform_point(v.transform().transform_point(p));
        assert!(close(back, p));
    }

    #[test]
    fn rotation_is_wrapped() {
        let mut v = View::default();
        v.set_rotation(-90.0);
        assert_eq!(v.rotation(), 270.0);
        v.rotate(100.0);
        assert!((v.rotation() - 10.0).abs() <= EPS);
    }

    #[test]
    fn move_and_zoom() {
        let mut v = View::from_rect(Rect::new(0.0, 0.0, 100.0, 50.0));
        v.move_by(Vec2::new(10.0, 5.0));
        v.zoom(2.0);
        assert_eq!(v.center(), Vec2::new(60.0, 30.0));
        assert_eq!(v.size(), Vec2::new(200.0, 100.0));
    }

    #[test]
    fn reset_keeps_viewport() {
        let mut v = View::default();
        v.set_viewport(Rect::new(0.5, 0.0, 0.5, 1.0));
        v.rotate(45.0);
        v.reset(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(v.rotation(), 0.0);
        assert_eq!(v.viewport(), Rect::new(0.5, 0.0, 0.5, 1.0));
        assert_eq!(v.center(), Vec2::new(5.0, 5.0));
    }
}
