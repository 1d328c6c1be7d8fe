//! Exit-callback registry: the last thing `run_finalizers` drains, after
//! every bootstrap finalizer has run.
//!
//! Mirrors `melon::register_exit_callback`: a simpler cousin of the
//! bootstrap registry with no priority or shuffle, callbacks run in the
//! order they were registered.

use crate::reentrancy::{self, Registry};
use once_cell::sync::OnceCell;
use std::sync::Mutex;

type Callback = Box<dyn FnOnce() + Send>;

static CALLBACKS: OnceCell<Mutex<Vec<Callback>>> = OnceCell::new();

fn callbacks() -> &'static Mutex<Vec<Callback>> {
    CALLBACKS.get_or_init(|| Mutex::new(Vec::new()))
}

/// Register a callback to run once, during [`crate::facade::run_finalizers`],
/// after every bootstrap finalizer.
pub fn push(cb: impl FnOnce() + Send + 'static) {
    reentrancy::assert_not_reentrant(Registry::Exit, "exit::push");
    callbacks()
        .lock()
        .expect("exit callback registry poisoned")
        .push(Box::new(cb));
}

/// Run every registered callback, in registration order, then empty the
/// registry. Called from [`crate::bootstrap::run_finalizers`]; not normally
/// called directly.
pub fn drain() {
    let pending = std::mem::take(&mut *callbacks().lock().expect("exit callback registry poisoned"));
    for cb in pending {
        reentrancy::guarded(Registry::Exit, cb);
    }
}

#[cfg(test)]
pub(crate) fn reset_for_test() {
    callbacks().lock().unwrap().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GLOBAL_TEST_LOCK as TEST_LOCK;
    use std::sync::{Arc, Mutex as StdMutex};

    #[test]
    fn callbacks_drain_in_registration_order() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        let order = Arc::new(StdMutex::new(Vec::new()));
        for i in 0..5u32 {
            let o = order.clone();
            push(move || o.lock().unwrap().push(i));
        }
        drain();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn drain_empties_the_registry() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        push(|| {});
        drain();
        assert!(callbacks().lock().unwrap().is_empty());
    }

    #[test]
    fn reentrant_push_from_callback_panics() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        push(|| {
            push(|| {});
        });
        let result = std::panic::catch_unwind(drain);
        assert!(result.is_err());
        reset_for_test();
    }
}
