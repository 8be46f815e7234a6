/// Signed position in target pixels (top-left origin, +Y down).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct IVec2 {
    pub x: i32,
    pub y: i32,
}

impl IVec2 {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel-space rectangle, as produced by resolving a view's normalized
/// viewport or scissor against a target size.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Clips the rectangle to `[0, size)`. Returns `None` when nothing is left.
    pub fn clamped_to(self, size: PixelSize) -> Option<IRect> {
        let w = size.width.min(i32::MAX as u32) as i32;
        let h = size.height.min(i32::MAX as u32) as i32;

        let x0 = self.x.clamp(0, w);
        let y0 = self.y.clamp(0, h);
        let x1 = self.x.saturating_add(self.width).clamp(0, w);
        let y1 = self.y.saturating_add(self.height).clamp(0, h);

        let clipped = IRect::new(x0, y0, x1 - x0, y1 - y0);
        if clipped.is_empty() { None } else { Some(clipped) }
    }
}

/// Size of a render target in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_to_trims_overhang() {
        let r = IRect::new(-10, 5, 100, 100).clamped_to(PixelSize::new(50, 40));
        assert_eq!(r, Some(IRect::new(0, 5, 50, 35)));
    }

    #[test]
    fn clamped_to_outside_is_none() {
        assert_eq!(IRect::new(60, 0, 10, 10).clamped_to(PixelSize::new(50, 40)), None);
    }
}
