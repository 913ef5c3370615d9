//! Shared error reporting helpers
//!
//! Module error types stay domain specific; this trait lets the binary report any of
//! them the same way.

/// Errors that know whether the user can fix them
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`. When it returns `false`, `user_message()` returns `None`.
pub trait ContextualError: std::error::Error {
    /// True when the error carries a message the user can act on directly,
    /// such as a bad rule file or an invalid filename pattern
    fn is_user_actionable(&self) -> bool;

    /// The message to show for user-actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error at the right level of detail
///
/// User-actionable errors print their own message. Everything else prints the
/// operation context, with the full error available at debug level.
///
/// ```rust,no_run
/// # use patchalert::core::error_handling::log_error_with_context;
/// # use patchalert::plugin::api::PluginError;
/// let err = PluginError::Configuration {
///     plugin_name: "apex".to_string(),
///     message: "rule file not found".to_string(),
/// };
/// log_error_with_context(&err, "Loading rule set");
/// // Logs: "FATAL: rule file not found"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
