//! Port interfaces for sync operations

use async_trait::async_trait;
use maayegue_domain::Result;

/// Reconciles local content caches with the remote document store
///
/// Each method returns the number of records written locally.
#[async_trait]
pub trait ContentReconciler: Send + Sync {
    /// Pull dictionary entries into the local cache
    async fn sync_dictionary(&self) -> Result<usize>;

    /// Pull lessons into the local cache
    async fn sync_lessons(&self) -> Result<usize>;

    /// Push and pull learning progress of one user
    async fn sync_progress(&self, user_id: &str) -> Result<usize>;
}
