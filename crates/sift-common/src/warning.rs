//! Deduplicated warnings for unsupported selector features.
//!
//! The evaluator accepts some constructs it cannot act on (`:has()`, unknown
//! pseudo-classes, pseudo-elements). Each distinct message is forwarded to the
//! [`log`] facade once, so evaluating the same selector against many roots does
//! not flood the log.

use std::collections::HashSet;
use std::sync::Mutex;

/// Global set of warnings we've already reported (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (logged once per unique message)
///
/// # Example
/// ```
/// sift_common::warning::warn_once("eval", ":has() is not evaluated");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    // Poisoned lock: report anyway.
    let first_time = WARNED.lock().map_or(true, |mut guard| {
        guard.get_or_insert_with(HashSet::new).insert(key)
    });

    if first_time {
        log::warn!(target: "sift", "[{component}] {message}");
    }
}

/// Returns `true` if `warn_once` has already reported this message.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .map(|guard| guard.as_ref().is_some_and(|set| set.contains(&key)))
        .unwrap_or(false)
}

/// Forget all recorded warnings so they are reported again.
pub fn clear_warnings() {
    if let Ok(mut guard) = WARNED.lock() {
        if let Some(set) = guard.as_mut() {
            set.clear();
        }
    }
}
