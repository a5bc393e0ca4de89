//! Sync on reconnect
//!
//! Watches the connectivity channel published by the host shell and
//! requests an automatic sync each time the device goes from offline to
//! online.

use std::sync::Arc;
use std::time::Duration;

use maayegue_common::QueueError;
use maayegue_core::SyncService;
use maayegue_domain::{Connectivity, SyncConfig};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};
use crate::scheduling::sync_scheduler::TaskHandle;

const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ConnectivityWatcher {
    service: SyncService,
    connectivity: watch::Receiver<Connectivity>,
    enabled: bool,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl ConnectivityWatcher {
    pub fn new(
        service: SyncService,
        connectivity: watch::Receiver<Connectivity>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            service,
            connectivity,
            enabled: config.sync_on_reconnect,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start watching. Does nothing when sync on reconnect is disabled.
    ///
    /// # Errors
    ///
    /// Returns error if the watcher is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        if !self.enabled {
            info!("Sync on reconnect disabled; watcher not started");
            return Ok(());
        }

        self.cancellation_token = CancellationToken::new();

        let service = self.service.clone();
        let mut connectivity = self.connectivity.clone();
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::watch_loop(service, &mut connectivity, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);
        info!("Connectivity watcher started");
        Ok(())
    }

    /// Stop watching and wait for the background task to exit
    ///
    /// # Errors
    ///
    /// Returns error if the watcher is not running or does not exit in time
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            tokio::time::timeout(JOIN_TIMEOUT, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: JOIN_TIMEOUT, source })??;
        }

        info!("Connectivity watcher stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    async fn watch_loop(
        service: SyncService,
        connectivity: &mut watch::Receiver<Connectivity>,
        cancel: CancellationToken,
    ) {
        let mut previous = *connectivity.borrow_and_update();
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Connectivity watcher cancelled");
                    break;
                }
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        debug!("Connectivity channel closed; watcher exiting");
                        break;
                    }
                    let current = *connectivity.borrow_and_update();
                    let reconnected = previous == Connectivity::Offline && current.is_online();
                    previous = current;
                    if !reconnected {
                        continue;
                    }

                    info!("Connectivity restored; requesting sync");
                    match service.auto_sync() {
                        Ok(()) => {}
                        Err(QueueError::Closed) => {
                            info!("Sync queue closed; watcher exiting");
                            break;
                        }
                        Err(e) => warn!(error = %e, "Failed to enqueue reconnect sync"),
                    }
                }
            }
        }
    }
}

impl Drop for ConnectivityWatcher {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

impl std::fmt::Debug for ConnectivityWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityWatcher")
            .field("enabled", &self.enabled)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
