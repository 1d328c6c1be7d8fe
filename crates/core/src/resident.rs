//! Process-lifetime storage for a value that is never destroyed.
//!
//! Mirrors `melon::resident<T>` / `melon::resident_singleton<T>`: storage
//! for a `T` that is constructed exactly once and whose destructor never
//! runs, without requiring a heap allocation. Downstream singletons (the ID
//! allocator table, the bootstrap registries, the exit-callback registry)
//! build on this so that logging — which may itself run during very late
//! (atexit) or very early (pre-main) code paths — can never observe them in
//! a torn-down state.
//!
//! Unlike a `OnceLock<T>` wrapper, `Resident<T>` suppresses `T::drop` even
//! when the `Resident` itself is a non-static, locally scoped value: the
//! storage is a `MaybeUninit<T>`, whose own `Drop` is a no-op regardless of
//! how the enclosing value is dropped.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::ops::{Deref, DerefMut};

/// A `T` that is constructed once, at [`Resident::new`], and never
/// destroyed.
pub struct Resident<T> {
    storage: UnsafeCell<MaybeUninit<T>>,
}

// SAFETY: access to the inner value is always through `&T`/`&mut T`
// obtained via normal borrow-checked methods below; `Resident` itself adds
// no extra interior mutability beyond what `T` already provides.
unsafe impl<T: Sync> Sync for Resident<T> {}
unsafe impl<T: Send> Send for Resident<T> {}

impl<T> Resident<T> {
    /// Construct the resident value immediately.
    pub fn new(value: T) -> Self {
        Resident { storage: UnsafeCell::new(MaybeUninit::new(value)) }
    }

    /// Borrow the contained value.
    pub fn get(&self) -> &T {
        // SAFETY: `storage` is always initialized by `new`; `Resident` has
        // no other constructor.
        unsafe { (*self.storage.get()).assume_init_ref() }
    }

    /// Mutably borrow the contained value.
    pub fn get_mut(&mut self) -> &mut T {
        unsafe { (*self.storage.get()).assume_init_mut() }
    }
}

impl<T> Deref for Resident<T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> DerefMut for Resident<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

// Deliberately no `impl<T> Drop for Resident<T>`: the absence is the whole
// point. `MaybeUninit<T>`'s own drop glue is a no-op, so `T::drop` never
// runs no matter where a `Resident<T>` ends up living.

/// Same contract as [`Resident`], but construction is restricted to
/// `pub(crate)` visibility — the closest stable approximation of C++'s
/// `friend T`, which has no direct Rust equivalent. `T` is expected to
/// expose its own `instance()`-style accessor from within this crate and
/// never hand out a way to construct a second `ResidentSingleton<T>`.
pub struct ResidentSingleton<T> {
    inner: Resident<T>,
}

impl<T> ResidentSingleton<T> {
    pub(crate) fn new(value: T) -> Self {
        ResidentSingleton { inner: Resident::new(value) }
    }

    pub fn get(&self) -> &T {
        self.inner.get()
    }
}

impl<T> Deref for ResidentSingleton<T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.inner.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static LIVE: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Counted {
        fn new() -> Self {
            LIVE.fetch_add(1, Ordering::SeqCst);
            Counted
        }
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            LIVE.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn resident_does_not_run_destructor_on_scope_exit() {
        LIVE.store(0, Ordering::SeqCst);
        {
            let _r = Resident::new(Counted::new());
            assert_eq!(LIVE.load(Ordering::SeqCst), 1);
        }
        // Scope ended, `_r` was dropped as a Rust value, but `Counted`'s
        // destructor must not have run.
        assert_eq!(LIVE.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn two_residents_are_independent() {
        LIVE.store(0, Ordering::SeqCst);
        let a = Resident::new(Counted::new());
        let b = Resident::new(Counted::new());
        assert_eq!(LIVE.load(Ordering::SeqCst), 2);
        drop(a);
        drop(b);
        assert_eq!(LIVE.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn deref_reaches_the_value() {
        let r = Resident::new(41u32);
        assert_eq!(*r, 41);
    }
}
