//! Common error types and utilities
//!
//! Standardized error handling infrastructure shared by every Ma'a yegue
//! crate. It is built on three pieces:
//!
//! 1. **`CommonError`**: recurring error patterns (failed background tasks,
//!    invariant violations)
//! 2. **`ErrorClassification` trait**: a standard interface for classifying
//!    errors by retryability, severity, and criticality
//! 3. **`ErrorSeverity` enum**: one severity scale for logging decisions
//!
//! ## Composition
//!
//! Module-specific errors compose with `CommonError` rather than duplicating
//! common patterns:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum MyModuleError {
//!     #[error("Invalid widget configuration: {0}")]
//!     InvalidWidget(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_classification!(MyModuleError, Common,
//!     Self::InvalidWidget(_) => {
//!         retryable: false,
//!         severity: ErrorSeverity::Error,
//!         critical: false,
//!     }
//! );
//! ```
//!
//! | Pattern | Variant |
//! |---------|---------|
//! | Background task returned an error or panicked | `TaskFailed` |
//! | Invariant violations | `Internal` |

use std::fmt;
use std::time::Duration;

/// Common error variants that appear across multiple modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A background task reported an error or panicked
    TaskFailed { task: String, reason: String },

    /// Internal errors that shouldn't normally occur
    Internal { message: String, context: Option<String> },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TaskFailed { task, reason } => write!(f, "Task '{task}' failed: {reason}"),
            Self::Internal { message, context } => match context {
                Some(ctx) => write!(f, "Internal error in '{ctx}': {message}"),
                None => write!(f, "Internal error: {message}"),
            },
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TaskFailed { .. } => ErrorSeverity::Error,
            Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    /// Create a failed-task error
    pub fn task_failed<T: Into<String>, R: Into<String>>(task: T, reason: R) -> Self {
        Self::TaskFailed { task: task.into(), reason: reason.into() }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into(), context: None }
    }

    /// Short variant name, used as the `error_type` logging field
    pub const fn error_type_name(&self) -> &'static str {
        match self {
            Self::TaskFailed { .. } => "task_failed",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Standard interface for classifying errors
///
/// Lets callers make consistent retry and logging decisions without matching
/// on concrete error types.
pub trait ErrorClassification {
    /// Check if this error is retryable
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for logging decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Macro to implement ErrorClassification by delegating to CommonError
///
/// ```rust,ignore
/// impl_error_classification!(MyError, Common,
///     Self::Specific(_) => {
///         retryable: false,
///         severity: ErrorSeverity::Error,
///         critical: false,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $(
                        $variant => $retryable,
                    )*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $(
                        $variant => $severity,
                    )*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_critical(e),
                    $(
                        $variant => $critical,
                    )*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::retry_after(e),
                    $(
                        $(
                            $variant => $retry_after,
                        )?
                    )*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            CommonError::task_failed("lessons", "boom").to_string(),
            "Task 'lessons' failed: boom"
        );
        assert_eq!(CommonError::internal("bug").to_string(), "Internal error: bug");
        let with_context =
            CommonError::Internal { message: "bug".into(), context: Some("drain".into()) };
        assert_eq!(with_context.to_string(), "Internal error in 'drain': bug");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(CommonError::internal("bug").severity(), ErrorSeverity::Critical);
        assert!(CommonError::internal("bug").is_critical());
        assert_eq!(CommonError::task_failed("sync", "boom").severity(), ErrorSeverity::Error);
        assert!(!CommonError::task_failed("sync", "boom").is_retryable());
        assert!(ErrorSeverity::Critical > ErrorSeverity::Warning);
    }
}
