//! Operational error taxonomy for the ambient stack surrounding the
//! lifecycle core itself (log directory setup, flag snapshot handoff) —
//! distinct from [`crate::status::Status`], which carries *recoverable*
//! faults the core's own operations produce.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that can occur while bringing the process up through
/// [`crate::facade::bootstrap_init`].
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("could not create log directory {path}: {source}")]
    LogDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log directory {0} exists but is not a directory")]
    LogDirNotADirectory(PathBuf),

    #[error("bootstrap_init called more than once in this process")]
    AlreadyInitialized,
}
