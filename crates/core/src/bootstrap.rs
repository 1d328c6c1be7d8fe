//! Prioritized bootstrap registry: collects `(priority, init, fini)`
//! triples at static-registration time, then runs them in a deterministic
//! order during an explicit `run_bootstrap`/`run_finalizers` phase.
//!
//! Mirrors `melon::register_bootstrap_callback` / `prepare_for_running_callbacks`
//! / `run_bootstrap` / `run_finalizers`. The registry moves through three
//! states: `staging` (accepting registrations), `frozen` (read-only,
//! shuffled, ready to run), `exhausted` (consumed). The frozen→exhausted
//! transition is implicit: once `run_initializers` returns, the init list
//! is cleared.

use crate::reentrancy::{self, Registry};
use once_cell::sync::OnceCell;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

type Callback = Box<dyn FnOnce() + Send>;

struct Staging {
    buckets: BTreeMap<i32, Vec<(Callback, Option<Callback>)>>,
}

struct Registry {
    staging: Mutex<Option<Staging>>,
    frozen: AtomicBool,
    init_list: Mutex<Vec<Callback>>,
    fini_list: Mutex<Vec<Callback>>,
}

static REGISTRY: OnceCell<Registry> = OnceCell::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry {
        staging: Mutex::new(Some(Staging { buckets: BTreeMap::new() })),
        frozen: AtomicBool::new(false),
        init_list: Mutex::new(Vec::new()),
        fini_list: Mutex::new(Vec::new()),
    })
}

/// Register an initializer, with priority `1` and no finalizer.
///
/// This is the convenience form the `MELON_BOOTSTRAP(init)` macro expands
/// to in the C++ source; Rust has no static-initialization-order-safe
/// equivalent of a file-scope constructor without a `ctor`-like crate (none
/// is present anywhere in the retrieval pack this workspace was built
/// from), so registration is an explicit function call made early in
/// `main` rather than something that runs automatically before it.
pub fn register(init: impl FnOnce() + Send + 'static) {
    register_with_priority(1, init, None::<fn()>)
}

/// Register an initializer/finalizer pair at an explicit priority.
/// Finalizers run in the opposite order their initializers actually ran
/// in (i.e. of the post-shuffle sequence), after every other finalizer at
/// a higher priority.
///
/// Panics if the registry has already been frozen by `run_bootstrap`, or
/// if called re-entrantly from within a running bootstrap/finalizer/exit
/// callback.
pub fn register_with_priority(
    priority: i32,
    init: impl FnOnce() + Send + 'static,
    fini: Option<impl FnOnce() + Send + 'static>,
) {
    reentrancy::assert_not_reentrant(Registry::Bootstrap, "bootstrap::register");
    let reg = registry();
    let mut staging = reg.staging.lock().expect("bootstrap staging mutex poisoned");
    match staging.as_mut() {
        Some(s) => {
            s.buckets.entry(priority).or_default().push((
                Box::new(init),
                fini.map(|f| Box::new(f) as Callback),
            ));
        }
        None => panic!(
            "bootstrap registry is frozen; registrations must happen before `run_bootstrap`"
        ),
    }
}

/// Freeze the staging registry — ascending by priority, uniformly shuffled
/// within each priority bucket using a process-lifetime random generator —
/// and run every initializer.
///
/// Must be called exactly once, after `bootstrap_init` and before any
/// worker threads depend on subsystem state the initializers set up.
pub fn run_bootstrap() {
    reentrancy::assert_not_reentrant(Registry::Bootstrap, "bootstrap::run_bootstrap");
    let reg = registry();
    freeze(reg);

    let callbacks = std::mem::take(&mut *reg.init_list.lock().expect("init list poisoned"));
    for cb in callbacks {
        reentrancy::guarded(Registry::Bootstrap, cb);
    }
}

/// Run every finalizer (reverse of the order its initializer actually ran
/// in), then drain the exit-callback registry.
///
/// Calling this before `run_bootstrap` has frozen the registry runs
/// whatever finalizers happen to have been registered so far — which, in
/// normal use, is none, since `run_bootstrap` is expected to run first.
pub fn run_finalizers() {
    reentrancy::assert_not_reentrant(Registry::Bootstrap, "bootstrap::run_finalizers");
    let reg = registry();
    let callbacks = std::mem::take(&mut *reg.fini_list.lock().expect("fini list poisoned"));
    for cb in callbacks {
        reentrancy::guarded(Registry::Bootstrap, cb);
    }
    crate::exit::drain();
}

fn freeze(reg: &Registry) {
    if reg.frozen.swap(true, Ordering::AcqRel) {
        // Already frozen: run_bootstrap was called twice. Treat as a no-op
        // rather than reshuffling an already-drained registry.
        return;
    }
    let mut staging = reg.staging.lock().expect("bootstrap staging mutex poisoned");
    let Staging { buckets } = staging.take().expect("staging already taken despite fresh freeze");
    drop(staging);

    let mut rng = rand::thread_rng();
    let mut init_list = Vec::new();
    let mut fini_aux = Vec::new();
    for (_priority, mut bucket) in buckets {
        bucket.shuffle(&mut rng);
        for (init, fini) in bucket {
            init_list.push(init);
            if let Some(f) = fini {
                fini_aux.push(f);
            }
        }
    }
    fini_aux.reverse();
    *reg.init_list.lock().expect("init list poisoned") = init_list;
    *reg.fini_list.lock().expect("fini list poisoned") = fini_aux;
}

/// Test-only: resets the registry to a fresh staging state so independent
/// test cases don't observe each other's registrations or frozen state.
#[cfg(test)]
pub(crate) fn reset_for_test() {
    let reg = registry();
    *reg.staging.lock().unwrap() = Some(Staging { buckets: BTreeMap::new() });
    reg.frozen.store(false, Ordering::SeqCst);
    reg.init_list.lock().unwrap().clear();
    reg.fini_list.lock().unwrap().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GLOBAL_TEST_LOCK as TEST_LOCK;
    use std::sync::atomic::{AtomicU32, Ordering as O};
    use std::sync::{Arc, Mutex as StdMutex};

    #[test]
    fn lower_priority_runs_before_higher() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        let order = Arc::new(StdMutex::new(Vec::new()));
        let o1 = order.clone();
        let o2 = order.clone();
        register_with_priority(0, move || o1.lock().unwrap().push("a"), None::<fn()>);
        register_with_priority(1, move || o2.lock().unwrap().push("b"), None::<fn()>);
        run_bootstrap();
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
        run_finalizers();
    }

    #[test]
    fn finalizers_run_in_reverse_of_init_order() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        let order = Arc::new(StdMutex::new(Vec::new()));
        let (ox, oxp) = (order.clone(), order.clone());
        let (oy, oyp) = (order.clone(), order.clone());
        register_with_priority(0, move || ox.lock().unwrap().push("x-init"), Some(move || oxp.lock().unwrap().push("x-fini")));
        register_with_priority(1, move || oy.lock().unwrap().push("y-init"), Some(move || oyp.lock().unwrap().push("y-fini")));
        run_bootstrap();
        run_finalizers();
        assert_eq!(
            *order.lock().unwrap(),
            vec!["x-init", "y-init", "y-fini", "x-fini"]
        );
    }

    #[test]
    #[should_panic(expected = "registrations must happen before")]
    fn register_after_freeze_is_fatal() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        run_bootstrap();
        register(|| {});
    }

    #[test]
    fn shuffle_is_live_across_runs() {
        let _guard = TEST_LOCK.lock().unwrap();
        // Not a strict guarantee (a shuffle *can* reproduce the identity
        // permutation), but with 10 items run many times the chance every
        // run lands on the identity order is astronomically small, so this
        // is a practical live-shuffle smoke test rather than a flaky one.
        let mut saw_non_identity = false;
        for _ in 0..20 {
            reset_for_test();
            let order = Arc::new(StdMutex::new(Vec::new()));
            for i in 0..10u32 {
                let o = order.clone();
                register_with_priority(1, move || o.lock().unwrap().push(i), None::<fn()>);
            }
            run_bootstrap();
            run_finalizers();
            if *order.lock().unwrap() != (0..10u32).collect::<Vec<_>>() {
                saw_non_identity = true;
                break;
            }
        }
        assert!(saw_non_identity, "shuffle never produced a non-identity order in 20 runs");
    }

    #[test]
    fn reentrant_registration_from_initializer_panics() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        register_with_priority(0, || {
            // Registering from inside a running initializer must not
            // deadlock; it must panic instead.
            register(|| {});
        }, None::<fn()>);
        let result = std::panic::catch_unwind(run_bootstrap);
        assert!(result.is_err());
        reset_for_test();
    }

    #[test]
    fn exit_callback_runs_after_every_finalizer() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        crate::exit::reset_for_test();
        let order = Arc::new(StdMutex::new(Vec::new()));
        let ofini = order.clone();
        register_with_priority(0, || {}, Some(move || ofini.lock().unwrap().push("fini")));
        let oexit = order.clone();
        crate::exit::push(move || oexit.lock().unwrap().push("exit"));
        run_bootstrap();
        run_finalizers();
        assert_eq!(*order.lock().unwrap(), vec!["fini", "exit"]);
    }

    #[test]
    fn initializer_registering_an_exit_callback_is_not_reentrant() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        crate::exit::reset_for_test();
        let order = Arc::new(StdMutex::new(Vec::new()));
        let o = order.clone();
        // An initializer registering an exit callback is a cross-registry
        // call, not a reentrant one — it must not panic.
        register_with_priority(
            0,
            move || {
                let o = o.clone();
                crate::exit::push(move || o.lock().unwrap().push("exit-from-init"));
            },
            None::<fn()>,
        );
        run_bootstrap();
        run_finalizers();
        assert_eq!(*order.lock().unwrap(), vec!["exit-from-init"]);
    }

    #[test]
    fn scenario_two_priority_buckets_with_one_finalizer() {
        let _guard = TEST_LOCK.lock().unwrap();
        reset_for_test();
        let order = Arc::new(StdMutex::new(Vec::new()));
        let fini_ran = Arc::new(AtomicU32::new(0));

        let o1 = order.clone();
        register_with_priority(5, move || o1.lock().unwrap().push("init1"), None::<fn()>);
        let o2 = order.clone();
        let fini2 = fini_ran.clone();
        register_with_priority(
            3,
            move || o2.lock().unwrap().push("init2"),
            Some(move || {
                fini2.fetch_add(1, O::SeqCst);
            }),
        );
        let o3 = order.clone();
        register_with_priority(3, move || o3.lock().unwrap().push("init3"), None::<fn()>);

        run_bootstrap();
        let observed = order.lock().unwrap().clone();
        assert!(
            observed == vec!["init2", "init3", "init1"] || observed == vec!["init3", "init2", "init1"],
            "unexpected order: {observed:?}"
        );
        run_finalizers();
        assert_eq!(fini_ran.load(O::SeqCst), 1);
    }
}
