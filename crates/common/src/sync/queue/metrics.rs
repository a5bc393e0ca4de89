use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};

/// Queue metrics for monitoring
#[derive(Debug, Default)]
pub struct QueueMetrics {
    pub total_enqueued: AtomicU64,
    pub total_completed: AtomicU64,
    pub total_failed: AtomicU64,
    pub total_rejected: AtomicU64,
    pub drains_started: AtomicU64,
    pub current_size: AtomicUsize,
    pub queue_depth_max: AtomicUsize,
    pub active_drains: AtomicUsize,
    pub max_concurrent_drains: AtomicUsize,
    pub processing_time_total_ms: AtomicU64,
    pub last_operation_time: AtomicU64,
}

impl QueueMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record enqueue operation
    pub fn record_enqueue(&self) {
        self.total_enqueued.fetch_add(1, AtomicOrdering::Relaxed);
        self.update_last_operation();
    }

    /// Record a task that resolved successfully
    pub fn record_completion(&self, duration_ms: u64) {
        self.total_completed.fetch_add(1, AtomicOrdering::Relaxed);
        self.processing_time_total_ms.fetch_add(duration_ms, AtomicOrdering::Relaxed);
        self.update_last_operation();
    }

    /// Record a task that returned an error or panicked
    pub fn record_failure(&self, duration_ms: u64) {
        self.total_failed.fetch_add(1, AtomicOrdering::Relaxed);
        self.processing_time_total_ms.fetch_add(duration_ms, AtomicOrdering::Relaxed);
        self.update_last_operation();
    }

    /// Record an enqueue refused because the queue was closed
    pub fn record_rejection(&self) {
        self.total_rejected.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Record the start of a drain loop
    pub fn record_drain_start(&self) {
        self.drains_started.fetch_add(1, AtomicOrdering::Relaxed);
        let active = self.active_drains.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        self.max_concurrent_drains.fetch_max(active, AtomicOrdering::SeqCst);
    }

    /// Record the end of a drain loop
    pub fn record_drain_end(&self) {
        self.active_drains.fetch_sub(1, AtomicOrdering::SeqCst);
    }

    /// Update current size
    pub fn update_size(&self, size: usize) {
        self.current_size.store(size, AtomicOrdering::Relaxed);
        self.queue_depth_max.fetch_max(size, AtomicOrdering::Relaxed);
    }

    /// Update last operation timestamp
    fn update_last_operation(&self) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.last_operation_time.store(now, AtomicOrdering::Relaxed);
    }

    /// Take a point-in-time copy of every counter
    pub fn snapshot(&self) -> QueueMetricsSnapshot {
        QueueMetricsSnapshot {
            total_enqueued: self.total_enqueued.load(AtomicOrdering::Relaxed),
            total_completed: self.total_completed.load(AtomicOrdering::Relaxed),
            total_failed: self.total_failed.load(AtomicOrdering::Relaxed),
            total_rejected: self.total_rejected.load(AtomicOrdering::Relaxed),
            drains_started: self.drains_started.load(AtomicOrdering::Relaxed),
            current_size: self.current_size.load(AtomicOrdering::Relaxed),
            queue_depth_max: self.queue_depth_max.load(AtomicOrdering::Relaxed),
            active_drains: self.active_drains.load(AtomicOrdering::SeqCst),
            max_concurrent_drains: self.max_concurrent_drains.load(AtomicOrdering::SeqCst),
            processing_time_total_ms: self.processing_time_total_ms.load(AtomicOrdering::Relaxed),
            last_operation_time: self.last_operation_time.load(AtomicOrdering::Relaxed),
        }
    }
}

/// Serializable snapshot of [`QueueMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueMetricsSnapshot {
    pub total_enqueued: u64,
    pub total_completed: u64,
    pub total_failed: u64,
    pub total_rejected: u64,
    pub drains_started: u64,
    pub current_size: usize,
    pub queue_depth_max: usize,
    pub active_drains: usize,
    pub max_concurrent_drains: usize,
    pub processing_time_total_ms: u64,
    pub last_operation_time: u64,
}

impl QueueMetricsSnapshot {
    /// Tasks that have run to completion, successfully or not
    pub const fn total_processed(&self) -> u64 {
        self.total_completed + self.total_failed
    }

    /// Average task duration in milliseconds
    pub fn average_processing_ms(&self) -> Option<f64> {
        let processed = self.total_processed();
        if processed == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(self.processing_time_total_ms as f64 / processed as f64)
    }
}
