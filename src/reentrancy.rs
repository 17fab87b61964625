//! Debug-only reentrancy tracker.
//!
//! Marks the spans of map operations that call into user code (`K: Eq`,
//! `K: Hash`, `TextKey::as_text`, comparators) while the index or chain may
//! be mid-update. Entering a second span before the first ends panics in
//! debug builds and names both operations. Release builds keep only the
//! `!Sync` marker.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map tracker. Guard an operation with `let _g = self.reentrancy.enter("set");`.
#[derive(Debug)]
pub(crate) struct Reentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Movable between threads, never shared: the map is not a concurrency primitive.
    _not_sync: PhantomData<Cell<()>>,
}

impl Reentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _not_sync: PhantomData,
        }
    }

    /// Enter the span of operation `op`. In debug builds, panics if another
    /// span of the same map is still open.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> Guard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.replace(Some(op)) {
                panic!("reentrant call to `{op}` while `{outer}` is in progress");
            }
            return Guard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return Guard { _z: PhantomData };
        }
    }
}

impl Default for Reentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII span returned by [`Reentrancy::enter`].
pub(crate) struct Guard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a Reentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for Guard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let prev = self.owner.active.take();
            debug_assert!(prev.is_some());
        }
    }
}
