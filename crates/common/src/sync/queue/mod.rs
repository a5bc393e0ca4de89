// Single-flight sync queue
// FIFO task runner with a single drain loop, metrics, and failure isolation

mod core;
mod errors;
pub mod metrics;
mod types;

pub use self::core::SyncQueue;
pub use self::errors::{QueueError, QueueResult};
pub use self::metrics::{QueueMetrics, QueueMetricsSnapshot};
pub use self::types::{SyncTask, TaskFuture};
