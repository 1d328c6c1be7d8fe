//! The three-call contract every consumer drives the lifecycle core
//! through: [`bootstrap_init`] → [`run_bootstrap`] → [`run_finalizers`].
//!
//! Mirrors `melon::bootstrap_init` / `melon::run_bootstrap` /
//! `melon::run_finalizers`: parse flags, apply overrides, start the logger
//! — in exactly that order — then freeze and run the bootstrap registry,
//! then later run finalizers and drain exit callbacks.

use crate::error::BootstrapError;
use crate::flags::{self, FlagDefaults};
use crate::logging::{self, LogConfig, LoggingHandle};
use crate::{bootstrap, exit};
use std::sync::atomic::{AtomicBool, Ordering};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Brings a process through the flag-override and logging setup that must
/// happen before any bootstrap initializer runs. `flags` is an
/// already-parsed CLI snapshot (typically a `clap::Parser` struct) that
/// implements [`FlagDefaults`] so pending overrides can tell whether they'd
/// clobber an explicit CLI value.
///
/// Panics if called more than once in a process — a second logger install
/// would panic inside `tracing` itself anyway; this surfaces the same
/// condition earlier and with a clearer message.
pub fn bootstrap_init(
    flags: &mut dyn FlagDefaults,
    log_config: &LogConfig,
) -> Result<LoggingHandle, BootstrapError> {
    if INITIALIZED.swap(true, Ordering::AcqRel) {
        return Err(BootstrapError::AlreadyInitialized);
    }
    flags::apply_overrides(flags);
    logging::init(log_config)
}

/// Freezes the bootstrap registry and runs every initializer, ascending by
/// priority and shuffled within each priority bucket. Must run after
/// [`bootstrap_init`] and before any worker thread depends on subsystem
/// state an initializer sets up.
pub fn run_bootstrap() {
    bootstrap::run_bootstrap();
}

/// Runs every finalizer (reverse of the order its initializer actually ran
/// in), then drains the exit-callback registry. The last thing a clean
/// shutdown does.
pub fn run_finalizers() {
    bootstrap::run_finalizers();
}

/// Registers an `(init, fini)` pair at `priority`, to run during
/// `run_bootstrap`/`run_finalizers`. Priority `0` is reserved by convention
/// for the lowest-level subsystems (e.g. a thread-index allocator) that
/// everything else's initializers may depend on.
pub fn register(
    priority: i32,
    init: impl FnOnce() + Send + 'static,
    fini: Option<impl FnOnce() + Send + 'static>,
) {
    bootstrap::register_with_priority(priority, init, fini);
}

/// Registers a callback to run once, after every finalizer, during
/// `run_finalizers`.
pub fn register_exit_callback(cb: impl FnOnce() + Send + 'static) {
    exit::push(cb);
}

#[cfg(test)]
pub(crate) fn reset_for_test() {
    INITIALIZED.store(false, Ordering::SeqCst);
}
