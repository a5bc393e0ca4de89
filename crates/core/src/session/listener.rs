use futures::{Stream, StreamExt};
use maayegue_domain::SessionUser;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::store::SessionStore;

/// Background task applying auth-state changes to a [`SessionStore`]
///
/// The stream yields the signed-in user after every provider state change
/// (`None` on sign-out). The listener ends when the stream ends or when it is
/// stopped.
#[derive(Debug)]
pub struct SessionListener {
    handle: JoinHandle<()>,
}

impl SessionListener {
    /// Spawn the listener on the current Tokio runtime
    pub fn spawn<S>(store: SessionStore, changes: S) -> Self
    where
        S: Stream<Item = Option<SessionUser>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            futures::pin_mut!(changes);
            while let Some(user) = changes.next().await {
                store.apply_auth_change(user);
            }
            debug!("Auth state stream ended");
        });
        info!("Session listener started");
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop listening. Changes already applied stay applied.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Wait for the stream to end
    pub async fn join(self) {
        // A cancelled or panicked listener has nothing left to report.
        let _ = self.handle.await;
    }
}
