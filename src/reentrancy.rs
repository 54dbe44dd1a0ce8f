//! Debug-only reentrancy tracking for `HashTable`.
//!
//! Table operations call into user code (`Display` and `Eq` on keys) while
//! chains are partially relinked. Each public entry point takes an
//! [`OpGuard`]; a second entry while one is live panics in debug builds.
//! Resize takes a [`ResizeGuard`] on top, which panics if a resize is ever
//! started from inside another one. In release builds both guards compile
//! to nothing.

use core::cell::Cell;
use core::marker::PhantomData;

#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    #[cfg(debug_assertions)]
    resizing: Cell<bool>,
    // Send but never Sync, in every build profile.
    _nosync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            #[cfg(debug_assertions)]
            resizing: Cell::new(false),
            _nosync: PhantomData,
        }
    }

    /// Mark `op` as running until the returned guard drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> OpGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrant `{op}` while `{outer}` is in progress on the same table");
            }
            self.active.set(Some(op));
            OpGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            OpGuard { _z: PhantomData }
        }
    }

    /// Mark a resize as running until the returned guard drops.
    #[inline]
    pub(crate) fn enter_resize(&self) -> ResizeGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.resizing.replace(true),
                "nested resize: a resize was triggered while rebuilding buckets"
            );
            ResizeGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            ResizeGuard { _z: PhantomData }
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct OpGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}

pub(crate) struct ResizeGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ResizeGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.resizing.set(false);
    }
}
