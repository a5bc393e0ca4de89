use thiserror::Error;

use crate::error::{CommonError, ErrorSeverity};

/// Queue operation errors
///
/// Task failures are not represented here: they are caught and logged inside
/// the drain loop and never propagate to the code that enqueued the task.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("Sync queue is closed")]
    Closed,
}

impl_error_classification!(QueueError, Common,
    Self::Closed => {
        retryable: false,
        severity: ErrorSeverity::Info,
        critical: false,
    }
);

/// Queue operation result type
pub type QueueResult<T> = Result<T, QueueError>;
