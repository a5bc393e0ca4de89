//! Integration tests for the sync service
//!
//! Verifies request ordering and failure isolation on top of the real
//! single-flight queue.

mod support;

use std::time::Duration;

use maayegue_common::testing::timeout_ok;
use maayegue_common::{QueueError, SyncTask};
use maayegue_core::SyncService;
use maayegue_domain::SyncKind;
use support::mocks::RecordingReconciler;

const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_auto_sync_twice_runs_dictionary_then_lessons_twice() -> anyhow::Result<()> {
    let reconciler = RecordingReconciler::new();
    let service = SyncService::new(reconciler.clone());

    service.auto_sync()?;
    service.auto_sync()?;
    timeout_ok(IDLE_TIMEOUT, service.wait_idle()).await?;

    assert_eq!(reconciler.log(), vec!["dictionary", "lessons", "dictionary", "lessons"]);
    assert_eq!(service.metrics().total_completed, 4);
    assert!(!service.is_syncing());
    Ok(())
}

#[tokio::test]
async fn test_failing_dictionary_sync_does_not_block_lessons() -> anyhow::Result<()> {
    let reconciler = RecordingReconciler::new();
    reconciler.fail(SyncKind::Dictionary);
    let service = SyncService::new(reconciler.clone());

    service.auto_sync()?;
    service.sync_progress("l-7")?;
    timeout_ok(IDLE_TIMEOUT, service.wait_idle()).await?;

    assert_eq!(reconciler.log(), vec!["dictionary", "lessons", "progress:l-7"]);
    let metrics = service.metrics();
    assert_eq!(metrics.total_failed, 1);
    assert_eq!(metrics.total_completed, 2);
    Ok(())
}

#[tokio::test]
async fn test_custom_tasks_share_the_queue_order() -> anyhow::Result<()> {
    let reconciler = RecordingReconciler::new();
    let service = SyncService::new(reconciler.clone());
    let (tx, rx) = tokio::sync::oneshot::channel();

    service.auto_sync()?;
    service.enqueue(
        SyncTask::infallible(move || async move {
            let _ = tx.send(());
        })
        .with_label("flush"),
    )?;

    timeout_ok(IDLE_TIMEOUT, rx).await??;
    assert_eq!(reconciler.log(), vec!["dictionary", "lessons"]);
    Ok(())
}

#[tokio::test]
async fn test_shutdown_drains_then_rejects() -> anyhow::Result<()> {
    let reconciler = RecordingReconciler::new();
    let service = SyncService::new(reconciler.clone());

    service.sync_progress("l-1")?;
    timeout_ok(IDLE_TIMEOUT, service.shutdown()).await?;

    assert_eq!(reconciler.log(), vec!["progress:l-1"]);
    assert!(matches!(service.auto_sync(), Err(QueueError::Closed)));
    Ok(())
}
