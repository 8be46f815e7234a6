use core::ops::{Mul, MulAssign};

use crate::coords::{Rect, Vec2};

/// Determinants at or below this magnitude are treated as singular.
const SINGULAR_EPSILON: f32 = f32::EPSILON * f32::EPSILON;

/// 2D affine transform stored as a row-major 3×3 matrix.
///
/// A point `(x, y)` maps to:
///
/// ```text
/// x' = m[0] * x + m[1] * y + m[2]
/// y' = m[3] * x + m[4] * y + m[5]
/// ```
///
/// The bottom row is `[0, 0, 1]` for every transform built through this API.
///
/// Composition reads left to right: `a.combined(&b)` (or `a * b`) maps a point
/// through `a` first, then through `b`. The builder helpers follow the same
/// rule, so `Transform::IDENTITY.translated(..).rotated(..)` translates first.
///
/// Equality is exact per coefficient.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    m: [f32; 9],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform::new(
        1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,
    );

    /// Builds a transform from nine coefficients, row by row.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        a00: f32, a01: f32, a02: f32,
        a10: f32, a11: f32, a12: f32,
        a20: f32, a21: f32, a22: f32,
    ) -> Self {
        Self { m: [a00, a01, a02, a10, a11, a12, a20, a21, a22] }
    }

    /// Pure translation.
    #[inline]
    pub const fn from_translation(offset: Vec2) -> Self {
        Self::new(
            1.0, 0.0, offset.x,
            0.0, 1.0, offset.y,
            0.0, 0.0, 1.0,
        )
    }

    /// Pure rotation about the origin. Positive angles turn +X towards +Y.
    pub fn from_rotation(degrees: f32) -> Self {
        Self::from_rotation_about(degrees, Vec2::zero())
    }

    /// Rotation about `center`, as a single matrix.
    pub fn from_rotation_about(degrees: f32, center: Vec2) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(
            cos, -sin, center.x * (1.0 - cos) + center.y * sin,
            sin, cos, center.y * (1.0 - cos) - center.x * sin,
            0.0, 0.0, 1.0,
        )
    }

    /// Pure scaling about the origin.
    #[inline]
    pub const fn from_scale(factors: Vec2) -> Self {
        Self::new(
            factors.x, 0.0, 0.0,
            0.0, factors.y, 0.0,
            0.0, 0.0, 1.0,
        )
    }

    /// Scaling about `center`, as a single matrix.
    #[inline]
    pub fn from_scale_about(factors: Vec2, center: Vec2) -> Self {
        Self::new(
            factors.x, 0.0, center.x * (1.0 - factors.x),
            0.0, factors.y, center.y * (1.0 - factors.y),
            0.0, 0.0, 1.0,
        )
    }

    /// Row-major coefficients.
    #[inline]
    pub const fn coefficients(&self) -> [f32; 9] {
        self.m
    }

    /// Column-major 4×4 matrix for GPU uniforms (column-vector convention).
    pub fn to_mat4(&self) -> [f32; 16] {
        let m = &self.m;
        [
            m[0], m[3], 0.0, m[6],
            m[1], m[4], 0.0, m[7],
            0.0, 0.0, 1.0, 0.0,
            m[2], m[5], 0.0, m[8],
        ]
    }

    // ── composition ───────────────────────────────────────────────────────

    /// Returns the transform that applies `self`, then `other`.
    pub fn combined(&self, other: &Transform) -> Transform {
        let a = &self.m;
        let b = &other.m;
        // Column-vector product `b · a`.
        let mut r = [0.0f32; 9];
        for row in 0..3 {
            for col in 0..3 {
                r[row * 3 + col] = b[row * 3] * a[col]
                    + b[row * 3 + 1] * a[3 + col]
                    + b[row * 3 + 2] * a[6 + col];
            }
        }
        Transform { m: r }
    }

    pub fn translated(&self, offset: Vec2) -> Transform {
        self.combined(&Self::from_translation(offset))
    }

    pub fn rotated(&self, degrees: f32) -> Transform {
        self.combined(&Self::from_rotation(degrees))
    }

    pub fn rotated_about(&self, degrees: f32, center: Vec2) -> Transform {
        self.combined(&Self::from_rotation_about(degrees, center))
    }

    pub fn scaled(&self, factors: Vec2) -> Transform {
        self.combined(&Self::from_scale(factors))
    }

    pub fn scaled_about(&self, factors: Vec2, center: Vec2) -> Transform {
        self.combined(&Self::from_scale_about(factors, center))
    }

    // ── in-place variants ─────────────────────────────────────────────────

    #[inline]
    pub fn combine(&mut self, other: &Transform) -> &mut Self {
        *self = self.combined(other);
        self
    }

    #[inline]
    pub fn translate(&mut self, offset: Vec2) -> &mut Self {
        self.combine(&Self::from_translation(offset))
    }

    #[inline]
    pub fn rotate(&mut self, degrees: f32) -> &mut Self {
        self.combine(&Self::from_rotation(degrees))
    }

    #[inline]
    pub fn rotate_about(&mut self, degrees: f32, center: Vec2) -> &mut Self {
        self.combine(&Self::from_rotation_about(degrees, center))
    }

    #[inline]
    pub fn scale(&mut self, factors: Vec2) -> &mut Self {
        self.combine(&Self::from_scale(factors))
    }

    #[inline]
    pub fn scale_about(&mut self, factors: Vec2, center: Vec2) -> &mut Self {
        self.combine(&Self::from_scale_about(factors, center))
    }

    // ── inversion / mapping ───────────────────────────────────────────────

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0] * (m[8] * m[4] - m[7] * m[5]) - m[3] * (m[8] * m[1] - m[7] * m[2])
            + m[6] * (m[5] * m[1] - m[4] * m[2])
    }

    /// Returns the inverse, or [`Transform::IDENTITY`] when the matrix is singular.
    pub fn inverse(&self) -> Transform {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= SINGULAR_EPSILON {
            return Transform::IDENTITY;
        }

        let m = &self.m;
        Transform::new(
            (m[8] * m[4] - m[7] * m[5]) / det,
            -(m[8] * m[1] - m[7] * m[2]) / det,
            (m[5] * m[1] - m[4] * m[2]) / det,
            -(m[8] * m[3] - m[6] * m[5]) / det,
            (m[8] * m[0] - m[6] * m[2]) / det,
            -(m[5] * m[0] - m[3] * m[2]) / det,
            (m[7] * m[3] - m[6] * m[4]) / det,
            -(m[7] * m[0] - m[6] * m[1]) / det,
            (m[4] * m[0] - m[3] * m[1]) / det,
        )
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(
            m[0] * p.x + m[1] * p.y + m[2],
            m[3] * p.x + m[4] * p.y + m[5],
        )
    }

    /// Axis-aligned bounding box of the four transformed corners of `rect`.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let [c0, c1, c2, c3] = rect.corners().map(|c| self.transform_point(c));
        let min = c0.min(c1).min(c2).min(c3);
        let max = c0.max(c1).max(c2).max(c3);
        Rect::from_origin_size(min, max - min)
    }
}

impl Mul for Transform {
    type Output = Transform;
    #[inline]
    fn mul(self, rhs: Transform) -> Transform {
        self.combined(&rhs)
    }
}

impl MulAssign for Transform {
    #[inline]
    fn mul_assign(&mut self, rhs: Transform) {
        self.combine(&rhs);
    }
}

impl Mul<Vec2> for Transform {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        self.transform_point(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn approx(a: &Transform, b: &Transform) -> bool {
        a.coefficients()
            .iter()
            .zip(b.coefficients().iter())
            .all(|(x, y)| (x - y).abs() <= EPS)
    }

    fn approx_pt(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() <= EPS && (a.y - b.y).abs() <= EPS
    }

    fn sample() -> Transform {
        Transform::new(
            2.0, 0.5, 3.0,
            -1.0, 1.5, -4.0,
            0.0, 0.0, 1.0,
        )
    }

    // ── algebra ───────────────────────────────────────────────────────────

    #[test]
    fn identity_is_neutral_on_both_sides() {
        let t = sample();
        assert_eq!(Transform::IDENTITY.combined(&t), t);
        assert_eq!(t.combined(&Transform::IDENTITY), t);
    }

    #[test]
    fn combine_is_associative() {
        let a = Transform::from_rotation(30.0);
        let b = Transform::from_translation(Vec2::new(5.0, -2.0));
        let c = Transform::from_scale(Vec2::new(2.0, 3.0));
        assert!(approx(&(a * b).combined(&c), &a.combined(&(b * c))));
    }

    #[test]
    fn combine_is_not_commutative() {
        let t = Transform::from_translation(Vec2::new(10.0, 0.0));
        let r = Transform::from_rotation(90.0);
        assert!(!approx(&t.combined(&r), &r.combined(&t)));
    }

    #[test]
    fn combined_applies_left_operand_first() {
        let a = Transform::from_translation(Vec2::new(10.0, 0.0));
        let b = Transform::from_rotation(90.0);
        let p = Vec2::new(1.0, 0.0);
        let expected = b.transform_point(a.transform_point(p));
        assert!(approx_pt(a.combined(&b).transform_point(p), expected));
        assert!(approx_pt((a * b) * p, expected));
    }

    #[test]
    fn in_place_matches_pure() {
        let mut t = Transform::IDENTITY;
        t.translate(Vec2::new(3.0, 4.0)).rotate(45.0).scale(Vec2::new(2.0, 2.0));
        let pure = Transform::IDENTITY
            .translated(Vec2::new(3.0, 4.0))
            .rotated(45.0)
            .scaled(Vec2::new(2.0, 2.0));
        assert_eq!(t, pure);
    }

    // ── centered helpers ──────────────────────────────────────────────────

    #[test]
    fn rotation_about_center_matches_translate_rotate_translate() {
        let c = Vec2::new(7.0, -3.0);
        let single = Transform::from_rotation_about(37.0, c);
        let chain = Transform::from_translation(-c)
            .rotated(37.0)
            .translated(c);
        assert!(approx(&single, &chain));
        assert!(approx_pt(single.transform_point(c), c));
    }

    #[test]
    fn rotated_about_pins_center_after_prior_steps() {
        let c = Vec2::new(4.0, 4.0);
        let t = Transform::from_translation(Vec2::new(1.0, 0.0)).rotated_about(90.0, c);
        assert!(approx_pt(t.transform_point(Vec2::new(3.0, 4.0)), c));
        assert!(approx_pt(t.transform_point(Vec2::new(4.0, 4.0)), Vec2::new(4.0, 5.0)));
    }

    #[test]
    fn scale_about_center_keeps_center_fixed() {
        let c = Vec2::new(4.0, 6.0);
        let t = Transform::from_scale_about(Vec2::new(3.0, 0.5), c);
        assert_eq!(t.transform_point(c), c);
        assert_eq!(t.transform_point(Vec2::new(5.0, 8.0)), Vec2::new(7.0, 7.0));
    }

    // ── inverse ───────────────────────────────────────────────────────────

    #[test]
    fn inverse_round_trips_to_identity() {
        let t = sample().rotated(20.0).translated(Vec2::new(1.0, 2.0));
        assert!(approx(&t.combined(&t.inverse()), &Transform::IDENTITY));
        assert!(approx(&t.inverse().combined(&t), &Transform::IDENTITY));
    }

    #[test]
    fn inverse_of_singular_is_identity() {
        let t = Transform::from_scale(Vec2::new(0.0, 2.0));
        assert_eq!(t.inverse(), Transform::IDENTITY);
    }

    #[test]
    fn inverse_of_translation_negates_offset() {
        let t = Transform::from_translation(Vec2::new(3.0, -8.0));
        assert_eq!(t.inverse(), Transform::from_translation(Vec2::new(-3.0, 8.0)));
    }

    // ── mapping ───────────────────────────────────────────────────────────

    #[test]
    fn transform_rect_under_quarter_turn_is_bounding_box() {
        let r = Transform::from_rotation(90.0).transform_rect(Rect::new(0.0, 0.0, 10.0, 20.0));
        assert!(approx_pt(r.origin, Vec2::new(-20.0, 0.0)));
        assert!(approx_pt(r.size, Vec2::new(20.0, 10.0)));
    }

    #[test]
    fn transform_rect_covers_all_rotated_corners() {
        let t = Transform::from_rotation(30.0);
        let rect = Rect::new(0.0, 0.0, 10.0, 20.0);
        let bounds = t.transform_rect(rect);
        for c in rect.corners() {
            let p = t.transform_point(c);
            assert!(p.x >= bounds.min().x - EPS && p.x <= bounds.max().x + EPS);
            assert!(p.y >= bounds.min().y - EPS && p.y <= bounds.max().y + EPS);
        }
    }

    #[test]
    fn to_mat4_places_translation_in_last_column() {
        let m = Transform::from_translation(Vec2::new(5.0, 6.0)).to_mat4();
        assert_eq!(&m[12..16], &[5.0, 6.0, 0.0, 1.0]);
        assert_eq!(m[0], 1.0);
        assert_eq!(m[5], 1.0);
    }
}
