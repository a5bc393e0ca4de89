//! Sync service - enqueues reconciliation work

use std::sync::Arc;

use maayegue_common::{QueueMetricsSnapshot, QueueResult, SyncQueue, SyncTask};
use maayegue_domain::SyncKind;
use tracing::{info, instrument};

use super::ports::ContentReconciler;

enum Job {
    Dictionary,
    Lessons,
    Progress(String),
}

impl Job {
    const fn kind(&self) -> SyncKind {
        match self {
            Self::Dictionary => SyncKind::Dictionary,
            Self::Lessons => SyncKind::Lessons,
            Self::Progress(_) => SyncKind::Progress,
        }
    }
}

/// Background sync entry point for the host shell
///
/// Every request becomes one task on the queue. Requests are fire-and-forget:
/// reconciliation errors are logged by the queue and never reach the caller.
#[derive(Clone)]
pub struct SyncService {
    queue: SyncQueue,
    reconciler: Arc<dyn ContentReconciler>,
}

impl SyncService {
    /// Create a sync service with its own queue
    pub fn new(reconciler: Arc<dyn ContentReconciler>) -> Self {
        Self::with_queue(SyncQueue::new(), reconciler)
    }

    /// Create a sync service on an existing queue
    pub fn with_queue(queue: SyncQueue, reconciler: Arc<dyn ContentReconciler>) -> Self {
        Self { queue, reconciler }
    }

    /// Enqueue an arbitrary task
    pub fn enqueue(&self, task: SyncTask) -> QueueResult<()> {
        self.queue.enqueue(task)
    }

    /// Reconcile the dictionary, then the lessons
    #[instrument(skip(self))]
    pub fn auto_sync(&self) -> QueueResult<()> {
        info!("Automatic sync requested");
        self.queue.enqueue(self.reconcile(Job::Dictionary))?;
        self.queue.enqueue(self.reconcile(Job::Lessons))
    }

    /// Reconcile one user's learning progress
    #[instrument(skip(self, user_id))]
    pub fn sync_progress(&self, user_id: impl Into<String>) -> QueueResult<()> {
        self.queue.enqueue(self.reconcile(Job::Progress(user_id.into())))
    }

    /// Whether reconciliation work is currently running
    pub fn is_syncing(&self) -> bool {
        self.queue.is_running()
    }

    pub fn metrics(&self) -> QueueMetricsSnapshot {
        self.queue.metrics()
    }

    /// Wait until every queued task has run
    pub async fn wait_idle(&self) {
        self.queue.wait_idle().await;
    }

    /// Stop accepting requests and let queued work finish
    pub async fn shutdown(&self) {
        self.queue.close();
        self.queue.wait_idle().await;
        info!("Sync service stopped");
    }

    fn reconcile(&self, job: Job) -> SyncTask {
        let reconciler = Arc::clone(&self.reconciler);
        let kind = job.kind();
        SyncTask::new(move || async move {
            let records = match job {
                Job::Dictionary => reconciler.sync_dictionary().await?,
                Job::Lessons => reconciler.sync_lessons().await?,
                Job::Progress(user_id) => reconciler.sync_progress(&user_id).await?,
            };
            info!(%kind, records, "Reconciliation finished");
            Ok::<_, maayegue_domain::MaayegueError>(())
        })
        .with_label(kind.to_string())
    }
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService").field("queue", &self.queue).finish_non_exhaustive()
    }
}
