/// Largest value an 8-bit stencil buffer can hold.
pub const STENCIL_MAX: u32 = 0xFF;

/// Stencil reference or mask value.
///
/// Conversions from integers reinterpret the bits; nothing is range-checked.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct StencilValue(pub u32);

impl StencilValue {
    /// All bits set.
    pub const ALL: StencilValue = StencilValue(u32::MAX);

    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for StencilValue {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<i32> for StencilValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self(value as u32)
    }
}

impl From<u64> for StencilValue {
    #[inline]
    fn from(value: u64) -> Self {
        Self(value as u32)
    }
}

impl From<i64> for StencilValue {
    #[inline]
    fn from(value: i64) -> Self {
        Self(value as u32)
    }
}

impl From<u8> for StencilValue {
    #[inline]
    fn from(value: u8) -> Self {
        Self(value as u32)
    }
}

/// Test applied between the masked stored value and the masked reference.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StencilComparison {
    Never,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    Always,
}

impl StencilComparison {
    /// Evaluates `lhs <comparison> rhs`.
    #[inline]
    pub fn evaluate(self, lhs: u32, rhs: u32) -> bool {
        match self {
            StencilComparison::Never => false,
            StencilComparison::Less => lhs < rhs,
            StencilComparison::LessEqual => lhs <= rhs,
            StencilComparison::Greater => lhs > rhs,
            StencilComparison::GreaterEqual => lhs >= rhs,
            StencilComparison::Equal => lhs == rhs,
            StencilComparison::NotEqual => lhs != rhs,
            StencilComparison::Always => true,
        }
    }

    /// The comparison with its operands swapped (`a < b` becomes `b > a`).
    #[inline]
    pub fn swapped(self) -> Self {
        match self {
            StencilComparison::Less => StencilComparison::Greater,
            StencilComparison::LessEqual => StencilComparison::GreaterEqual,
            StencilComparison::Greater => StencilComparison::Less,
            StencilComparison::GreaterEqual => StencilComparison::LessEqual,
            other => other,
        }
    }
}

/// Update applied to the stencil buffer when a fragment passes the test.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StencilUpdateOperation {
    /// Leave the stored value unchanged.
    Keep,
    /// Write zero.
    Zero,
    /// Write the reference value.
    Replace,
    /// Add one, saturating at [`STENCIL_MAX`].
    Increment,
    /// Subtract one, saturating at zero.
    Decrement,
    /// Flip all bits of the stored value.
    Invert,
}

impl StencilUpdateOperation {
    /// Returns the value the operation produces for an 8-bit buffer.
    #[inline]
    pub fn apply(self, stored: u32, reference: u32) -> u32 {
        let stored = stored & STENCIL_MAX;
        match self {
            StencilUpdateOperation::Keep => stored,
            StencilUpdateOperation::Zero => 0,
            StencilUpdateOperation::Replace => reference & STENCIL_MAX,
            StencilUpdateOperation::Increment => (stored + 1).min(STENCIL_MAX),
            StencilUpdateOperation::Decrement => stored.saturating_sub(1),
            StencilUpdateOperation::Invert => !stored & STENCIL_MAX,
        }
    }
}

/// Stencil test and update rule for a draw.
///
/// A fragment passes when `(stored & mask) <comparison> (reference & mask)`.
/// On pass the buffer is updated with `update_operation`, limited to the bits
/// in `mask`. With `stencil_only` set, color writes are suppressed for the
/// whole draw whatever the test outcome.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StencilMode {
    pub comparison: StencilComparison,
    pub update_operation: StencilUpdateOperation,
    pub reference: StencilValue,
    pub mask: StencilValue,
    pub stencil_only: bool,
}

impl StencilMode {
    /// Always passes and never writes: a no-op stencil configuration.
    pub const DEFAULT: StencilMode = StencilMode {
        comparison: StencilComparison::Always,
        update_operation: StencilUpdateOperation::Keep,
        reference: StencilValue(0),
        mask: StencilValue::ALL,
        stencil_only: false,
    };

    #[inline]
    pub const fn new(
        comparison: StencilComparison,
        update_operation: StencilUpdateOperation,
        reference: StencilValue,
        mask: StencilValue,
        stencil_only: bool,
    ) -> Self {
        Self { comparison, update_operation, reference, mask, stencil_only }
    }

    /// True when the mode neither tests nor writes anything.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.comparison == StencilComparison::Always
            && self.update_operation == StencilUpdateOperation::Keep
            && !self.stencil_only
    }

    /// Runs the stencil test against a stored buffer value.
    #[inline]
    pub fn passes(&self, stored: u32) -> bool {
        let mask = self.mask.get() & STENCIL_MAX;
        let reference = self.reference.get() & STENCIL_MAX;
        self.comparison.evaluate(stored & mask, reference & mask)
    }

    /// Returns the buffer value after a fragment with this mode is processed.
    ///
    /// Failing fragments keep the stored value; passing ones get the update
    /// operation, restricted to the bits selected by `mask`.
    pub fn resolve(&self, stored: u32) -> u32 {
        let stored = stored & STENCIL_MAX;
        if !self.passes(stored) {
            return stored;
        }
        let mask = self.mask.get() & STENCIL_MAX;
        let updated = self.update_operation.apply(stored, self.reference.get());
        (stored & !mask) | (updated & mask)
    }
}

impl Default for StencilMode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_manual_noop() {
        let manual = StencilMode::new(
            StencilComparison::Always,
            StencilUpdateOperation::Keep,
            StencilValue(0),
            StencilValue(0xFFFF_FFFF),
            false,
        );
        assert_eq!(StencilMode::default(), manual);
        assert_eq!(StencilMode::DEFAULT, manual);
        assert!(manual.is_noop());
    }

    #[test]
    fn equality_covers_stencil_only() {
        let mut m = StencilMode::DEFAULT;
        m.stencil_only = true;
        assert_ne!(m, StencilMode::DEFAULT);
    }

    #[test]
    fn value_conversions_reinterpret_bits() {
        assert_eq!(StencilValue::from(-1i32), StencilValue(u32::MAX));
        assert_eq!(StencilValue::from(0x1_0000_0002u64), StencilValue(2));
        assert_eq!(StencilValue::from(7u8), StencilValue(7));
    }

    // ── test rule ─────────────────────────────────────────────────────────

    #[test]
    fn comparison_reads_stored_against_reference() {
        let mode = StencilMode::new(
            StencilComparison::Less,
            StencilUpdateOperation::Keep,
            StencilValue(5),
            StencilValue::ALL,
            false,
        );
        assert!(mode.passes(4));
        assert!(!mode.passes(5));
        assert!(!mode.passes(6));
    }

    #[test]
    fn mask_applies_to_both_sides() {
        let mode = StencilMode::new(
            StencilComparison::Equal,
            StencilUpdateOperation::Keep,
            StencilValue(0b1010),
            StencilValue(0b0010),
            false,
        );
        assert!(mode.passes(0b0110));
        assert!(!mode.passes(0b1000));
    }

    #[test]
    fn reference_is_truncated_to_buffer_depth() {
        let mode = StencilMode::new(
            StencilComparison::Equal,
            StencilUpdateOperation::Replace,
            StencilValue(0x100),
            StencilValue::ALL,
            false,
        );
        assert!(mode.passes(0));
        assert!(!mode.passes(1));
        assert_eq!(mode.resolve(0), 0);
    }

    #[test]
    fn never_and_always() {
        assert!(!StencilComparison::Never.evaluate(1, 1));
        assert!(StencilComparison::Always.evaluate(0, 9));
    }

    #[test]
    fn swapped_mirrors_ordering() {
        for (a, b) in [(1, 2), (2, 1), (3, 3)] {
            for cmp in [
                StencilComparison::Less,
                StencilComparison::LessEqual,
                StencilComparison::Greater,
                StencilComparison::GreaterEqual,
                StencilComparison::Equal,
                StencilComparison::NotEqual,
            ] {
                assert_eq!(cmp.evaluate(a, b), cmp.swapped().evaluate(b, a));
            }
        }
    }

    // ── update rule ───────────────────────────────────────────────────────

    #[test]
    fn update_operations_saturate_in_eight_bits() {
        assert_eq!(StencilUpdateOperation::Increment.apply(0xFF, 0), 0xFF);
        assert_eq!(StencilUpdateOperation::Decrement.apply(0, 0), 0);
        assert_eq!(StencilUpdateOperation::Invert.apply(0x0F, 0), 0xF0);
        assert_eq!(StencilUpdateOperation::Replace.apply(3, 0x1_02), 0x02);
        assert_eq!(StencilUpdateOperation::Zero.apply(9, 1), 0);
    }

    #[test]
    fn resolve_writes_only_on_pass_and_within_mask() {
        let mode = StencilMode::new(
            StencilComparison::Always,
            StencilUpdateOperation::Replace,
            StencilValue(0xFF),
            StencilValue(0x0F),
            true,
        );
        assert_eq!(mode.resolve(0x30), 0x3F);

        let failing = StencilMode { comparison: StencilComparison::Never, ..mode };
        assert_eq!(failing.resolve(0x30), 0x30);
    }
}
