//! The canonical bootstrap example from the lifecycle core: a priority-0
//! initializer that claims thread-index 0 for the main thread.

use ignition_core::IdAllocator;

/// Namespace tag discriminating this allocator from any other `usize`
/// allocator the process might create.
pub struct ThreadIndexTag;

/// Registers the priority-0 thread-index claim. Call once, before
/// `run_bootstrap`.
pub fn register_main_thread_claim() {
    ignition_core::facade::register(
        0,
        || {
            let claimed = IdAllocator::<usize, ThreadIndexTag>::next();
            debug_assert_eq!(claimed, 0, "main thread must claim index 0");
            tracing::debug!(thread_index = claimed, "claimed thread index for main thread");
        },
        Some(|| {
            IdAllocator::<usize, ThreadIndexTag>::free(0);
        }),
    );
}
