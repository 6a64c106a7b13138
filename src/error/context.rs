//! Error context utilities
//!
//! Helpers for attaching context to foreign errors and for deciding, based on
//! severity, whether a failure stops the run or is only reported.

use std::path::Path;
use tracing::{error, warn};

use crate::error::{ErrorSeverity, FactsError, Result};

/// Extension trait for Result to attach the path an error concerns
pub trait ResultExt<T, E> {
    /// Add file context to an error
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| {
            let path = path.as_ref().to_path_buf();
            if let Some(io_err) = (&err as &dyn std::error::Error).downcast_ref::<std::io::Error>() {
                if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                    return FactsError::PermissionDenied { path };
                }
            }
            FactsError::DirectoryTraversal {
                path,
                message: err.to_string(),
            }
        })
    }
}

/// Handle an error based on its severity
///
/// Warnings and regular errors are logged and swallowed. Critical errors are
/// logged and handed back to the caller.
pub fn handle_error(err: FactsError) -> Option<FactsError> {
    let message = err.user_message();

    match err.severity() {
        ErrorSeverity::Warning => {
            warn!("{}", message);
            None
        }
        ErrorSeverity::Error => {
            error!("{}", message);
            None
        }
        ErrorSeverity::Critical => {
            error!(critical = true, "{}", message);
            Some(err)
        }
    }
}

/// Extension trait for Option to convert to Result with a custom error
pub trait OptionExt<T> {
    /// Convert Option to Result with a custom error
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> FactsError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_error<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> FactsError,
    {
        self.ok_or_else(err_fn)
    }
}
