//! Logger initialization: stderr vs. rolling-file destination, gated by the
//! "log to stderr" flag, with a background cleaner for files older than
//! "log save days".
//!
//! Mirrors `melon::log_config_init`: info/debug sinks are disabled outright
//! (not merely redirected) when stderr logging is off, which here means the
//! installed `EnvFilter` governs both destinations identically — there is
//! exactly one active layer at a time, not two layers with different
//! thresholds.

use crate::error::BootstrapError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logger configuration, derived from CLI flags by the binary crate.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_to_stderr: bool,
    pub log_dir: Option<PathBuf>,
    pub log_save_days: u32,
    pub log_buffer_seconds: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { log_to_stderr: true, log_dir: None, log_save_days: 7, log_buffer_seconds: 30 }
    }
}

/// Resolves the effective log directory: an explicit flag value wins,
/// otherwise `GOOGLE_LOG_DIR`, otherwise `TEST_TMPDIR` (so tests under a
/// build sandbox don't scribble outside it), otherwise the OS temp dir.
pub fn resolve_log_dir(flag_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = flag_dir {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var("GOOGLE_LOG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Ok(dir) = std::env::var("TEST_TMPDIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    std::env::temp_dir()
}

/// Whether the terminal attached to stderr looks like it supports ANSI
/// color codes — `TERM=dumb` (or unset) disables it, matching the
/// original's terminal-capability probe.
fn stderr_supports_color() -> bool {
    !matches!(std::env::var("TERM").as_deref(), Ok("dumb") | Err(_))
}

/// Holds resources that must outlive the process for logging to keep
/// flushing: the non-blocking writer's worker thread guard, and a handle to
/// the background file-pruning thread (stderr mode doesn't create one).
pub struct LoggingHandle {
    _writer_guard: WorkerGuard,
    _cleaner: Option<std::thread::JoinHandle<()>>,
}

/// Install the global tracing subscriber per `config`. Must be called at
/// most once per process (a second call panics, matching the one-time
/// global-subscriber contract `tracing` itself enforces).
pub fn init(config: &LogConfig) -> Result<LoggingHandle, BootstrapError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_to_stderr {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(stderr_supports_color())
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .with(filter)
            .init();
        return Ok(LoggingHandle { _writer_guard: guard, _cleaner: None });
    }

    let dir = resolve_log_dir(config.log_dir.as_deref());
    ensure_log_dir(&dir)?;

    let file_appender = tracing_appender::rolling::daily(&dir, "ignitiond.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .with(filter)
        .init();

    let cleaner = spawn_cleaner(dir, config.log_save_days, config.log_buffer_seconds);
    Ok(LoggingHandle { _writer_guard: guard, _cleaner: Some(cleaner) })
}

fn ensure_log_dir(dir: &Path) -> Result<(), BootstrapError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BootstrapError::LogDirNotADirectory(dir.to_path_buf())),
        Err(_) => std::fs::create_dir_all(dir)
            .map_err(|source| BootstrapError::LogDirCreate { path: dir.to_path_buf(), source }),
    }
}

/// Background thread that, every `buffer_seconds`, deletes files under
/// `dir` whose modification time is older than `save_days`.
fn spawn_cleaner(dir: PathBuf, save_days: u32, buffer_seconds: u64) -> std::thread::JoinHandle<()> {
    let period = Duration::from_secs(buffer_seconds.max(1));
    let max_age = Duration::from_secs(u64::from(save_days) * 24 * 60 * 60);
    std::thread::spawn(move || loop {
        std::thread::sleep(period);
        prune_old_logs(&dir, max_age);
    })
}

fn prune_old_logs(dir: &Path, max_age: Duration) {
    let Ok(entries) = std::fs::read_dir(dir) else { return };
    let now = std::time::SystemTime::now();
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(meta) = entry.metadata() else { continue };
        if !meta.is_file() {
            continue;
        }
        let Ok(modified) = meta.modified() else { continue };
        if now.duration_since(modified).unwrap_or_default() > max_age {
            let _ = std::fs::remove_file(&path);
        }
    }
}
