//! Periodic automatic sync
//!
//! Provides an interval-based scheduler with lifecycle management. Each tick
//! asks the [`SyncService`] for an automatic sync while the device is online;
//! offline ticks are skipped.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use maayegue_core::SyncService;
//! use maayegue_domain::{Connectivity, SyncConfig};
//! use maayegue_infra::scheduling::{SyncScheduler, SyncSchedulerConfig};
//! use tokio::sync::watch;
//!
//! # async fn example(service: SyncService) -> maayegue_infra::SchedulerResult<()> {
//! let (_tx, connectivity) = watch::channel(Connectivity::Online);
//! let mut scheduler = SyncScheduler::new(
//!     service,
//!     connectivity,
//!     SyncSchedulerConfig::from(&SyncConfig::default()),
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use maayegue_common::QueueError;
use maayegue_core::SyncService;
use maayegue_domain::{Connectivity, SyncConfig};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
pub(crate) type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for sync scheduler
#[derive(Debug, Clone)]
pub struct SyncSchedulerConfig {
    /// Time between automatic syncs
    pub interval: Duration,
    /// When false, [`SyncScheduler::start`] succeeds without spawning a loop
    pub enabled: bool,
    /// How long [`SyncScheduler::stop`] waits for the loop to exit
    pub join_timeout: Duration,
}

impl Default for SyncSchedulerConfig {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

impl From<&SyncConfig> for SyncSchedulerConfig {
    fn from(config: &SyncConfig) -> Self {
        Self {
            interval: config.interval(),
            enabled: config.enabled,
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Sync scheduler for periodic automatic sync
pub struct SyncScheduler {
    service: SyncService,
    connectivity: watch::Receiver<Connectivity>,
    config: SyncSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl SyncScheduler {
    pub fn new(
        service: SyncService,
        connectivity: watch::Receiver<Connectivity>,
        config: SyncSchedulerConfig,
    ) -> Self {
        Self {
            service,
            connectivity,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that requests an automatic sync every
    /// interval. Does nothing when the scheduler is disabled.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        if !self.config.enabled {
            info!("Periodic sync disabled; scheduler not started");
            return Ok(());
        }

        info!(interval = ?self.config.interval, "Starting sync scheduler");

        // Fresh token so the scheduler can restart after stop
        self.cancellation_token = CancellationToken::new();

        let service = self.service.clone();
        let connectivity = self.connectivity.clone();
        let interval = self.config.interval;
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::sync_loop(service, connectivity, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the background task and awaits completion.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is not running, or if the loop does not
    /// exit within the join timeout
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping sync scheduler");
        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;
        }

        info!("Sync scheduler stopped");
        Ok(())
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    async fn sync_loop(
        service: SyncService,
        connectivity: watch::Receiver<Connectivity>,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Sync loop cancelled");
                    break;
                }
                () = tokio::time::sleep(interval) => {
                    if !connectivity.borrow().is_online() {
                        debug!("Offline; skipping scheduled sync");
                        continue;
                    }
                    match service.auto_sync() {
                        Ok(()) => debug!("Scheduled sync enqueued"),
                        Err(QueueError::Closed) => {
                            info!("Sync queue closed; scheduler exiting");
                            break;
                        }
                        Err(e) => warn!(error = %e, "Failed to enqueue scheduled sync"),
                    }
                }
            }
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

impl std::fmt::Debug for SyncScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncScheduler")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
