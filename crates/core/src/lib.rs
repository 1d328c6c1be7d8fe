//! Process lifecycle core: resident singleton storage, a recoverable-fault
//! carrier, namespace-tagged ID recycling, a flag-override registry, and a
//! prioritized bootstrap/exit-callback registry pair, wired together by a
//! three-call `bootstrap_init → run_bootstrap → run_finalizers` facade.
//!
//! This crate stays CLI-library-agnostic: [`facade::bootstrap_init`] takes
//! an already-parsed flag snapshot through the [`flags::FlagDefaults`]
//! trait rather than reading `env::args()` itself, so nothing upstream of a
//! binary crate needs to know which flag library that binary chose.

pub mod bootstrap;
pub mod error;
pub mod exit;
pub mod facade;
pub mod flags;
pub mod id_alloc;
pub mod logging;
mod reentrancy;
pub mod resident;
pub mod status;

pub use error::BootstrapError;
pub use id_alloc::{IdAllocator, IdValue};
pub use resident::{Resident, ResidentSingleton};
pub use status::Status;

/// Serializes tests across modules that share process-global state
/// (`bootstrap`, `exit`, `facade`) so independent test threads don't
/// interleave registrations against the same registry.
#[cfg(test)]
pub(crate) static GLOBAL_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
