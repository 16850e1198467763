//! Generic error handling utilities
//!
//! Provides unified error handling that can work across different error types
//! while maintaining domain-specific error logging patterns.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with a helpful, actionable message. When it returns `false`,
/// `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on directly
    ///
    /// Examples of user-actionable errors:
    /// - Missing credential or id files
    /// - Invalid configuration values
    ///
    /// Examples of system errors:
    /// - IO failures while reading an existing file
    /// - Runtime failures
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors show their own message. System errors show the
/// operation context, with the underlying error at debug level.
///
/// # Examples
/// ```rust,no_run
/// # use vkfetch::core::error_handling::log_error_with_context;
/// # use vkfetch::app::input::InputError;
/// let err = InputError::Unreadable {
///     path: "tokens.txt".into(),
///     message: "No such file or directory".into(),
/// };
/// log_error_with_context(&err, "Loading credentials");
/// // Logs: "FATAL: cannot read tokens.txt: No such file or directory"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    if error.is_user_actionable() {
        if let Some(user_msg) = error.user_message() {
            log::error!("FATAL: {}", user_msg);
        } else {
            log::error!("FATAL: {}", operation_context);
        }
    } else {
        log::error!("FATAL: {}: {}", operation_context, error);
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
