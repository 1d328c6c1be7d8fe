//! Command-line flags, parsed with `clap` and handed to
//! `ignition_core::facade::bootstrap_init` as an already-parsed snapshot.

use clap::Parser;
use ignition_core::flags::FlagDefaults;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND: &str = "127.0.0.1:8871";
const DEFAULT_LOG_SAVE_DAYS: u32 = 7;
const DEFAULT_LOG_BUFFER_SECONDS: u64 = 30;

#[derive(Parser, Debug, Clone)]
#[command(name = "ignitiond", about = "Lifecycle core demo daemon")]
pub struct Flags {
    /// Address to bind the HTTP surface to.
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Log to stderr instead of a rolling file under `--log-dir`.
    #[arg(long, default_value_t = true)]
    pub log_to_stderr: bool,

    /// Directory for rolling log files when `--log-to-stderr` is false.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Days to retain rolling log files before the background cleaner
    /// deletes them.
    #[arg(long, default_value_t = DEFAULT_LOG_SAVE_DAYS)]
    pub log_save_days: u32,

    /// How often the background log cleaner wakes up to prune stale files.
    #[arg(long, default_value_t = DEFAULT_LOG_BUFFER_SECONDS)]
    pub log_buffer_seconds: u64,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            bind: DEFAULT_BIND.parse().expect("DEFAULT_BIND is a valid socket address"),
            log_to_stderr: true,
            log_dir: None,
            log_save_days: DEFAULT_LOG_SAVE_DAYS,
            log_buffer_seconds: DEFAULT_LOG_BUFFER_SECONDS,
        }
    }
}

/// `clap` has no live "is this still default" query the way gflags does, so
/// "still at its default" is determined here by comparing the parsed value
/// against the struct's own `Default` impl — recorded once, at the moment
/// a flag override is applied.
impl FlagDefaults for Flags {
    fn is_default(&self, name: &str) -> bool {
        let defaults = Flags::default();
        match name {
            "bind" => self.bind == defaults.bind,
            "log_to_stderr" => self.log_to_stderr == defaults.log_to_stderr,
            "log_dir" => self.log_dir == defaults.log_dir,
            "log_save_days" => self.log_save_days == defaults.log_save_days,
            "log_buffer_seconds" => self.log_buffer_seconds == defaults.log_buffer_seconds,
            _ => false,
        }
    }

    fn set(&mut self, name: &str, value: &str) {
        match name {
            "bind" => {
                if let Ok(addr) = value.parse() {
                    self.bind = addr;
                }
            }
            "log_to_stderr" => {
                if let Ok(b) = value.parse() {
                    self.log_to_stderr = b;
                }
            }
            "log_dir" => self.log_dir = Some(PathBuf::from(value)),
            "log_save_days" => {
                if let Ok(n) = value.parse() {
                    self.log_save_days = n;
                }
            }
            "log_buffer_seconds" => {
                if let Ok(n) = value.parse() {
                    self.log_buffer_seconds = n;
                }
            }
            _ => {}
        }
    }
}

impl Flags {
    pub fn log_config(&self) -> ignition_core::logging::LogConfig {
        ignition_core::logging::LogConfig {
            log_to_stderr: self.log_to_stderr,
            log_dir: self.log_dir.clone(),
            log_save_days: self.log_save_days,
            log_buffer_seconds: self.log_buffer_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_default_bind_is_reported_as_non_default() {
        let mut flags = Flags::default();
        flags.bind = "0.0.0.0:9000".parse().unwrap();
        assert!(!flags.is_default("bind"));
        assert!(flags.is_default("log_to_stderr"));
    }

    #[test]
    fn set_updates_the_named_field() {
        let mut flags = Flags::default();
        flags.set("log_save_days", "14");
        assert_eq!(flags.log_save_days, 14);
    }
}
