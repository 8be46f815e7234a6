//! Per-thread record of which render target is current.
//!
//! A target's backend context may be current on one thread at a time, and a
//! thread has at most one current target. Activating a target replaces the
//! previous one for that thread.

use std::cell::Cell;

thread_local! {
    static CURRENT_TARGET: Cell<Option<u64>> = const { Cell::new(None) };
}

#[inline]
pub(crate) fn current_target() -> Option<u64> {
    CURRENT_TARGET.with(Cell::get)
}

#[inline]
pub(crate) fn is_current(id: u64) -> bool {
    current_target() == Some(id)
}

/// Marks `id` current, returning the target it replaced.
pub(crate) fn make_current(id: u64) -> Option<u64> {
    CURRENT_TARGET.with(|c| c.replace(Some(id)))
}

/// Clears the current target if it is `id`.
pub(crate) fn release(id: u64) {
    CURRENT_TARGET.with(|c| {
        if c.get() == Some(id) {
            c.set(None);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_current_replaces_previous() {
        std::thread::spawn(|| {
            assert_eq!(make_current(10), None);
            assert_eq!(make_current(11), Some(10));
            assert!(is_current(11));
            release(10);
            assert!(is_current(11));
            release(11);
            assert_eq!(current_target(), None);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn current_target_is_per_thread() {
        make_current(42);
        let other = std::thread::spawn(current_target).join().unwrap();
        assert_eq!(other, None);
        release(42);
    }
}
