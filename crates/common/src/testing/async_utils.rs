//! Async testing utilities

use std::future::Future;
use std::time::Duration;

/// Await `fut`, failing with `Elapsed` if it does not finish within
/// `duration`. Keeps a hung drain or listener from hanging the test run.
pub async fn timeout_ok<F, T>(duration: Duration, fut: F) -> Result<T, tokio::time::error::Elapsed>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, fut).await
}

/// Poll an async condition until it returns true or `timeout` passes.
///
/// Uses Tokio time, so it cooperates with a paused test clock.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(interval).await;
    }

    false
}
