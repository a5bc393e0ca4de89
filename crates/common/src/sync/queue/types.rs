use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;

/// Future produced by a [`SyncTask`]. The error side carries the rendered
/// failure reason; the queue wraps it into a `CommonError` for logging.
pub type TaskFuture = BoxFuture<'static, Result<(), String>>;

type TaskFn = Box<dyn FnOnce() -> TaskFuture + Send>;

/// Opaque zero-argument unit of asynchronous work.
///
/// A task has no identity beyond its position in the queue; the optional
/// label only shows up in logs. Tasks are consumed by running them and are
/// never retried.
pub struct SyncTask {
    label: Option<String>,
    work: TaskFn,
}

impl SyncTask {
    /// Wrap a fallible async closure.
    ///
    /// The error is rendered with `Display` and logged by the queue; it never
    /// reaches whoever enqueued the task.
    pub fn new<F, Fut, E>(work: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: fmt::Display + 'static,
    {
        Self {
            label: None,
            work: Box::new(move || {
                Box::pin(async move { work().await.map_err(|err| err.to_string()) })
            }),
        }
    }

    /// Wrap an async closure that cannot fail.
    pub fn infallible<F, Fut>(work: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            label: None,
            work: Box::new(move || {
                Box::pin(async move {
                    work().await;
                    Ok(())
                })
            }),
        }
    }

    /// Attach a label used in log lines.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label given at construction, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Consume the task and start its work.
    pub(crate) fn run(self) -> TaskFuture {
        (self.work)()
    }
}

impl fmt::Debug for SyncTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncTask").field("label", &self.label).finish_non_exhaustive()
    }
}

/// A task waiting in the queue together with its position.
#[derive(Debug)]
pub(crate) struct QueuedTask {
    pub sequence: u64,
    pub task: SyncTask,
}
