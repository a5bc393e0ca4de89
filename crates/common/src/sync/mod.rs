//! Background reconciliation primitives
//!
//! ## Submodules
//!
//! - **`queue`**: single-flight FIFO queue that runs best-effort sync tasks
//!   one at a time and isolates their failures

pub mod queue;

pub use queue::{
    QueueError, QueueMetrics, QueueMetricsSnapshot, QueueResult, SyncQueue, SyncTask, TaskFuture,
};

