//! Synchronization utilities for robust mutex handling
//!
//! Two policies are offered for a poisoned lock: convert the poison into an
//! application error, or recover the guarded data and carry on. The work
//! queue uses recovery since its contents stay consistent across a panic in
//! any caller (each mutation is a single push or pop).

use std::sync::{LockResult, Mutex, MutexGuard};

/// Handle poisoned mutex cases with consistent error handling
///
/// Converts mutex poison errors into application-specific errors using a
/// provided error constructor.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use vkfetch::core::sync::handle_mutex_poison;
/// use vkfetch::sink::api::SinkError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(
///     mutex.lock(),
///     |message| SinkError::Poisoned { message }
/// ).unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

/// Lock a mutex, recovering the guard if a previous holder panicked
pub fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("Recovering poisoned lock; a previous holder panicked");
        poisoned.into_inner()
    })
}
