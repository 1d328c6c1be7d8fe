//! Flag-override registry: "set flag X to value V, maybe forcibly",
//! recorded before flag parsing and applied once, right after it.
//!
//! Mirrors `melon::detail::register_flags_overrider` /
//! `apply_flags_overrider`. Values are always stored as strings — the CLI
//! flags struct is responsible for parsing them back into their real types
//! when [`apply_overrides`] hands them over.

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Mutex;

struct Override {
    value: String,
    forcibly: bool,
}

static REGISTRY: OnceCell<Mutex<HashMap<String, Override>>> = OnceCell::new();

fn registry() -> &'static Mutex<HashMap<String, Override>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Resolves whether a named flag is still at its library-supplied default.
///
/// `clap` (unlike gflags) doesn't expose a live "is this still default"
/// query, so the binary crate that owns the `clap::Parser` struct is
/// expected to implement this by comparing the parsed value against the
/// struct's declared defaults and reporting the result back in here.
pub trait FlagDefaults {
    fn is_default(&self, name: &str) -> bool;
    fn set(&mut self, name: &str, value: &str);
}

/// Register a pending override. Fatal (panics) on a duplicate name — two
/// translation units racing to override the same flag is a programmer
/// error, not something to silently resolve.
pub fn register_override(name: impl Into<String>, value: impl Into<String>, forcibly: bool) {
    let name = name.into();
    let mut map = registry().lock().expect("flag override registry poisoned");
    if map.contains_key(&name) {
        panic!("duplicate flag override registered for `{name}`");
    }
    map.insert(name, Override { value: value.into(), forcibly });
}

/// Apply every recorded override to `flags`: an override wins if the flag
/// is still at its default, or if the override was registered `forcibly`.
pub fn apply_overrides(flags: &mut dyn FlagDefaults) {
    let map = registry().lock().expect("flag override registry poisoned");
    for (name, over) in map.iter() {
        if over.forcibly || flags.is_default(name) {
            flags.set(name, &over.value);
            tracing::trace!(flag = %name, value = %over.value, "overriding flag");
        }
    }
}

/// Test-only: empties the registry so independent test cases don't observe
/// each other's registrations (the registry is process-global by design).
#[cfg(test)]
fn clear() {
    registry().lock().expect("flag override registry poisoned").clear();
}
