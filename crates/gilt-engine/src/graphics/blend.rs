/// Multiplier applied to the source or destination operand of a blend equation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendFactor {
    /// (0, 0, 0, 0)
    Zero,
    /// (1, 1, 1, 1)
    One,
    /// (src.r, src.g, src.b, src.a)
    SrcColor,
    /// (1, 1, 1, 1) - (src.r, src.g, src.b, src.a)
    OneMinusSrcColor,
    /// (dst.r, dst.g, dst.b, dst.a)
    DstColor,
    /// (1, 1, 1, 1) - (dst.r, dst.g, dst.b, dst.a)
    OneMinusDstColor,
    /// (src.a, src.a, src.a, src.a)
    SrcAlpha,
    /// (1, 1, 1, 1) - (src.a, src.a, src.a, src.a)
    OneMinusSrcAlpha,
    /// (dst.a, dst.a, dst.a, dst.a)
    DstAlpha,
    /// (1, 1, 1, 1) - (dst.a, dst.a, dst.a, dst.a)
    OneMinusDstAlpha,
}

/// How the weighted source and destination are combined.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BlendEquation {
    /// `src * src_factor + dst * dst_factor`
    Add,
    /// `src * src_factor - dst * dst_factor`
    Subtract,
    /// `dst * dst_factor - src * src_factor`
    ReverseSubtract,
    /// `min(src, dst)`, factors ignored
    Min,
    /// `max(src, dst)`, factors ignored
    Max,
}

/// Separable blend description for color and alpha channels.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlendMode {
    pub color_src_factor: BlendFactor,
    pub color_dst_factor: BlendFactor,
    pub color_equation: BlendEquation,
    pub alpha_src_factor: BlendFactor,
    pub alpha_dst_factor: BlendFactor,
    pub alpha_equation: BlendEquation,
}

impl BlendMode {
    /// Blend source and destination according to the source alpha.
    pub const ALPHA: BlendMode = BlendMode::separate(
        BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha,
        BlendEquation::Add,
        BlendFactor::One,
        BlendFactor::OneMinusSrcAlpha,
        BlendEquation::Add,
    );

    /// Add source to destination.
    pub const ADD: BlendMode = BlendMode::separate(
        BlendFactor::SrcAlpha,
        BlendFactor::One,
        BlendEquation::Add,
        BlendFactor::One,
        BlendFactor::One,
        BlendEquation::Add,
    );

    /// Multiply source and destination.
    pub const MULTIPLY: BlendMode =
        BlendMode::new(BlendFactor::DstColor, BlendFactor::Zero, BlendEquation::Add);

    /// Take the minimum of source and destination.
    pub const MIN: BlendMode = BlendMode::new(BlendFactor::One, BlendFactor::One, BlendEquation::Min);

    /// Take the maximum of source and destination.
    pub const MAX: BlendMode = BlendMode::new(BlendFactor::One, BlendFactor::One, BlendEquation::Max);

    /// Overwrite destination with source.
    pub const NONE: BlendMode = BlendMode::new(BlendFactor::One, BlendFactor::Zero, BlendEquation::Add);

    /// Same factors and equation for color and alpha.
    #[inline]
    pub const fn new(src: BlendFactor, dst: BlendFactor, equation: BlendEquation) -> Self {
        Self::separate(src, dst, equation, src, dst, equation)
    }

    #[inline]
    pub const fn separate(
        color_src_factor: BlendFactor,
        color_dst_factor: BlendFactor,
        color_equation: BlendEquation,
        alpha_src_factor: BlendFactor,
        alpha_dst_factor: BlendFactor,
        alpha_equation: BlendEquation,
    ) -> Self {
        Self {
            color_src_factor,
            color_dst_factor,
            color_equation,
            alpha_src_factor,
            alpha_dst_factor,
            alpha_equation,
        }
    }
}

impl Default for BlendMode {
    fn default() -> Self {
        Self::ALPHA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_alpha() {
        assert_eq!(BlendMode::default(), BlendMode::ALPHA);
    }

    #[test]
    fn new_mirrors_color_into_alpha() {
        let m = BlendMode::MULTIPLY;
        assert_eq!(m.alpha_src_factor, BlendFactor::DstColor);
        assert_eq!(m.alpha_dst_factor, BlendFactor::Zero);
        assert_eq!(m.alpha_equation, BlendEquation::Add);
    }

    #[test]
    fn alpha_uses_one_for_alpha_source() {
        assert_eq!(BlendMode::ALPHA.alpha_src_factor, BlendFactor::One);
        assert_ne!(BlendMode::ALPHA, BlendMode::ADD);
    }
}
