use std::any::Any;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::{debug, error, info, instrument, warn};

use super::errors::{QueueError, QueueResult};
use super::metrics::{QueueMetrics, QueueMetricsSnapshot};
use super::types::{QueuedTask, SyncTask};
use crate::error::CommonError;

/// Pending tasks plus the drain flag. Both live behind one lock so the
/// check-and-set of `running` in `enqueue` and its clear at the end of a
/// drain can never interleave.
#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<QueuedTask>,
    running: bool,
    closed: bool,
    next_sequence: u64,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<QueueState>,
    metrics: QueueMetrics,
    idle: Notify,
}

/// Single-flight FIFO runner for best-effort reconciliation tasks.
///
/// ## Ordering
///
/// Tasks run strictly in enqueue order, one at a time. A task starts only
/// after the previous one has settled, whether it succeeded, failed, or
/// panicked. There is no priority and no coalescing: enqueuing the same kind
/// of work twice runs it twice.
///
/// ## Failure handling
///
/// A failing task is logged and counted, then the drain moves on. Nothing is
/// retried or persisted; a process restart drops whatever is still pending.
///
/// ## Concurrency
///
/// At most one drain loop exists at any time. `enqueue` never waits: it
/// appends under a short lock and, if no drain is active, spawns one on the
/// current Tokio runtime. The lock is never held across an await.
///
/// Cloning a `SyncQueue` yields another handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct SyncQueue {
    inner: Arc<Inner>,
}

impl SyncQueue {
    /// Create an empty, open queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to the tail of the queue and make sure a drain is
    /// running.
    ///
    /// Fire-and-forget: the only error is [`QueueError::Closed`].
    #[instrument(skip(self, task), fields(task = task.label().unwrap_or("unlabeled")))]
    pub fn enqueue(&self, task: SyncTask) -> QueueResult<()> {
        let start_drain = {
            let mut state = self.inner.state.lock();
            if state.closed {
                self.inner.metrics.record_rejection();
                return Err(QueueError::Closed);
            }

            let sequence = state.next_sequence;
            state.next_sequence += 1;
            state.pending.push_back(QueuedTask { sequence, task });

            self.inner.metrics.record_enqueue();
            self.inner.metrics.update_size(state.pending.len());
            debug!(sequence, depth = state.pending.len(), "Sync task enqueued");

            Self::claim_drain(&self.inner, &mut state)
        };

        if start_drain {
            self.spawn_drain();
        }
        Ok(())
    }

    /// Resolve once the queue is empty and no drain is active.
    ///
    /// Tasks left behind by an enqueue that happened outside a Tokio runtime
    /// are drained first.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let start_drain = {
                let mut state = self.inner.state.lock();
                if !state.running && state.pending.is_empty() {
                    return;
                }
                Self::claim_drain(&self.inner, &mut state)
            };
            if start_drain {
                self.spawn_drain();
            }

            notified.await;
        }
    }

    /// Refuse further enqueues. Tasks already pending still run.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        if !state.closed {
            state.closed = true;
            info!(pending = state.pending.len(), "Sync queue closed");
        }
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// Whether a drain loop is currently active
    pub fn is_running(&self) -> bool {
        self.inner.state.lock().running
    }

    /// Number of tasks waiting to start (the in-flight task is not counted)
    pub fn pending_len(&self) -> usize {
        self.inner.state.lock().pending.len()
    }

    /// Point-in-time metrics
    pub fn metrics(&self) -> QueueMetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Mark the queue as draining if it has work and nobody drains it yet.
    /// Returns true when the caller must spawn the drain.
    fn claim_drain(inner: &Inner, state: &mut QueueState) -> bool {
        if state.running || state.pending.is_empty() {
            return false;
        }
        state.running = true;
        inner.metrics.record_drain_start();
        true
    }

    fn spawn_drain(&self) {
        match Handle::try_current() {
            Ok(runtime) => {
                let inner = Arc::clone(&self.inner);
                runtime.spawn(async move { inner.drain().await });
            }
            Err(_) => {
                let mut state = self.inner.state.lock();
                state.running = false;
                self.inner.metrics.record_drain_end();
                warn!(
                    pending = state.pending.len(),
                    "No active Tokio runtime; sync tasks stay pending until the next enqueue"
                );
            }
        }
    }
}

impl Inner {
    async fn drain(self: Arc<Self>) {
        info!("Sync queue drain started");

        loop {
            let next = {
                let mut state = self.state.lock();
                if let Some(next) = state.pending.pop_front() {
                    self.metrics.update_size(state.pending.len());
                    next
                } else {
                    state.running = false;
                    self.metrics.record_drain_end();
                    break;
                }
            };
            self.run_task(next).await;
        }

        info!("Sync queue drained");
        self.idle.notify_waiters();
    }

    async fn run_task(&self, queued: QueuedTask) {
        let QueuedTask { sequence, task } = queued;
        let label = task.label().unwrap_or("unlabeled").to_string();
        let started = Instant::now();

        let outcome = AssertUnwindSafe(async move { task.run().await }).catch_unwind().await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(Ok(())) => {
                self.metrics.record_completion(elapsed_ms);
                debug!(sequence, task = %label, elapsed_ms, "Sync task completed");
            }
            Ok(Err(reason)) => {
                self.metrics.record_failure(elapsed_ms);
                let err = CommonError::task_failed(&label, reason);
                error!(sequence, elapsed_ms, error_type = err.error_type_name(), error = %err, "Sync task failed");
            }
            Err(payload) => {
                self.metrics.record_failure(elapsed_ms);
                let err = CommonError::task_failed(&label, panic_message(payload.as_ref()));
                error!(sequence, elapsed_ms, error_type = err.error_type_name(), error = %err, "Sync task panicked");
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
