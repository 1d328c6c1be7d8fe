//! Re-entrancy guard shared by the bootstrap and exit-callback registries.
//!
//! Callbacks invoked by a registry must not call back into *that same*
//! registry (doing so deadlocks on the registry's own mutex) — but a
//! bootstrap initializer registering an exit callback, or similar
//! cross-registry calls, is legitimate and must not be rejected. Since the
//! mutex itself can't tell "it's me calling, from inside my own callback"
//! apart from "a sibling registry is calling in", a thread-local tracks
//! *which* registry is currently executing a callback, and only a call back
//! into that same registry panics.

use std::cell::Cell;

/// Identifies which registry's callback is currently running on this
/// thread, so a re-entrant call can be distinguished from a legitimate
/// cross-registry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Registry {
    Bootstrap,
    Exit,
}

thread_local! {
    static ACTIVE: Cell<Option<Registry>> = const { Cell::new(None) };
}

/// Panics if called while `registry` is currently running a callback on this
/// thread. A call made while a *different* registry's callback is running is
/// not reentrant and does not panic.
pub(crate) fn assert_not_reentrant(registry: Registry, what: &str) {
    let active = ACTIVE.with(|cell| cell.get());
    if active == Some(registry) {
        panic!("reentrant call to {what} from within a running lifecycle callback");
    }
}

/// Restores the previously-active registry (if any) when dropped, including
/// when unwinding past a panicking callback — otherwise a callback that
/// panics (e.g. the reentrancy check itself firing) would leave the flag
/// stuck on the wrong registry for the rest of the thread's lifetime,
/// including across later, unrelated test cases that happen to reuse the
/// same test-harness thread.
struct Guard(Option<Registry>);

impl Drop for Guard {
    fn drop(&mut self) {
        ACTIVE.with(|cell| cell.set(self.0));
    }
}

/// Runs `f` with `registry` marked as currently executing, so that any call
/// `f` makes back into `registry` panics instead of deadlocking. Calls `f`
/// makes into a *different* registry are left alone.
pub(crate) fn guarded<R>(registry: Registry, f: impl FnOnce() -> R) -> R {
    let previous = ACTIVE.with(|cell| cell.replace(Some(registry)));
    let _guard = Guard(previous);
    f()
}
