use crate::gpu::{Shader, Texture};

use super::{BlendMode, StencilMode, Transform};

/// Interpretation of vertex texture coordinates.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum CoordinateType {
    /// Coordinates in `[0, 1]` across the texture.
    Normalized,
    /// Coordinates in texels.
    #[default]
    Pixels,
}

/// Everything a single draw call needs besides its vertices.
///
/// The bundle borrows its texture and shader; it never owns them. The borrow
/// checker enforces that both outlive every draw that uses the bundle.
/// A draw receives exactly one bundle and uses it as-is; bundles are never merged.
///
/// Equality compares texture and shader by identity, not by content.
#[derive(Debug, Copy, Clone)]
pub struct RenderStates<'a> {
    pub blend_mode: BlendMode,
    pub stencil_mode: StencilMode,
    pub transform: Transform,
    pub coordinate_type: CoordinateType,
    pub texture: Option<&'a Texture>,
    pub shader: Option<&'a Shader>,
}

impl RenderStates<'static> {
    /// All fields at their defaults.
    pub const DEFAULT: RenderStates<'static> = RenderStates {
        blend_mode: BlendMode::ALPHA,
        stencil_mode: StencilMode::DEFAULT,
        transform: Transform::IDENTITY,
        coordinate_type: CoordinateType::Pixels,
        texture: None,
        shader: None,
    };
}

impl<'a> RenderStates<'a> {
    #[inline]
    pub fn from_blend_mode(blend_mode: BlendMode) -> Self {
        Self { blend_mode, ..RenderStates::DEFAULT }
    }

    #[inline]
    pub fn from_stencil_mode(stencil_mode: StencilMode) -> Self {
        Self { stencil_mode, ..RenderStates::DEFAULT }
    }

    #[inline]
    pub fn from_transform(transform: Transform) -> Self {
        Self { transform, ..RenderStates::DEFAULT }
    }

    #[inline]
    pub fn from_coordinate_type(coordinate_type: CoordinateType) -> Self {
        Self { coordinate_type, ..RenderStates::DEFAULT }
    }

    #[inline]
    pub fn from_texture(texture: &'a Texture) -> Self {
        Self { texture: Some(texture), ..RenderStates::DEFAULT }
    }

    #[inline]
    pub fn from_shader(shader: &'a Shader) -> Self {
        Self { shader: Some(shader), ..RenderStates::DEFAULT }
    }
}

impl Default for RenderStates<'_> {
    fn default() -> Self {
        RenderStates::DEFAULT
    }
}

impl PartialEq for RenderStates<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.blend_mode == other.blend_mode
            && self.stencil_mode == other.stencil_mode
            && self.transform == other.transform
            && self.coordinate_type == other.coordinate_type
            && same_ref(self.texture, other.texture)
            && same_ref(self.shader, other.shader)
    }
}

fn same_ref<T>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => core::ptr::eq(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::graphics::{StencilComparison, StencilUpdateOperation, StencilValue};

    #[test]
    fn default_instance_has_documented_fields() {
        let s = RenderStates::default();
        assert_eq!(s.blend_mode, BlendMode::ALPHA);
        assert_eq!(s.stencil_mode, StencilMode::DEFAULT);
        assert_eq!(s.transform, Transform::IDENTITY);
        assert_eq!(s.coordinate_type, CoordinateType::Pixels);
        assert!(s.texture.is_none());
        assert!(s.shader.is_none());
        assert_eq!(s, RenderStates::DEFAULT);
    }

    #[test]
    fn each_constructor_overrides_one_field() {
        let s = RenderStates::from_blend_mode(BlendMode::ADD);
        assert_eq!(s, RenderStates { blend_mode: BlendMode::ADD, ..RenderStates::DEFAULT });

        let stencil = StencilMode::new(
            StencilComparison::Equal,
            StencilUpdateOperation::Keep,
            StencilValue(1),
            StencilValue::ALL,
            false,
        );
        let s = RenderStates::from_stencil_mode(stencil);
        assert_eq!(s, RenderStates { stencil_mode: stencil, ..RenderStates::DEFAULT });

        let t = Transform::from_translation(Vec2::new(1.0, 2.0));
        let s = RenderStates::from_transform(t);
        assert_eq!(s, RenderStates { transform: t, ..RenderStates::DEFAULT });

        let s = RenderStates::from_coordinate_type(CoordinateType::Normalized);
        assert_eq!(
            s,
            RenderStates { coordinate_type: CoordinateType::Normalized, ..RenderStates::DEFAULT }
        );
    }

    #[test]
    fn same_ref_compares_identity() {
        let a = 1u8;
        let b = 1u8;
        assert!(same_ref(Some(&a), Some(&a)));
        assert!(!same_ref(Some(&a), Some(&b)));
        assert!(!same_ref(Some(&a), None));
    }
}
