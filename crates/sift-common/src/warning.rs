//! Selector warnings with coloured terminal output.
//!
//! Provides deduplication so that a selector evaluated many times does not
//! repeat the same diagnostic. Used by the compiler to report permissive
//! misses such as unknown pseudo-classes.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// When set, warnings are still recorded but never printed.
static QUIET: AtomicBool = AtomicBool::new(false);

fn warning_key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about an accepted-but-inert construct (prints once per unique message).
///
/// # Example
/// ```
/// use sift_common::warning::{has_warned, warn_once};
/// warn_once("Selector", "unknown pseudo-class ':hover' never matches");
/// assert!(has_warned("Selector", "unknown pseudo-class ':hover' never matches"));
/// ```
pub fn warn_once(component: &str, message: &str) {
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(warning_key(component, message));

    if first_time && !QUIET.load(Ordering::Relaxed) {
        eprintln!("{}", format!("[sift {component}] ⚠ {message}").yellow());
    }
}

/// Whether `warn_once` has already recorded this `(component, message)` pair.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&warning_key(component, message)))
}

/// Suppress (or re-enable) printing of warnings.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Clear all recorded warnings.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
