use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait for reporting overall progress of a download operation.
/// All methods should be thread-safe, and none of the synchronous ones may block.
#[async_trait]
pub trait ProgressListener: Send + Sync + Debug {
    /// Sets the total number of items expected. Called once, before `start`.
    fn set_total(&self, total: u64);

    /// Signals that one item reached a terminal, non-error outcome (found or downloaded).
    fn add(&self, name: &str);

    /// Runs the display until `stop` is cancelled, then clears it.
    ///
    /// The downloader spawns this as its own task, so it may run for the whole operation.
    async fn start(&self, stop: CancellationToken);

    /// Erases whatever is currently displayed. Valid even if `start` was never called.
    fn clear(&self);
}

/// A no-operation implementation of `ProgressListener`.
/// Used when progress display is disabled (quiet or verbose mode).
#[derive(Debug, Clone)]
pub struct NoOpProgressListener;

#[async_trait]
impl ProgressListener for NoOpProgressListener {
    fn set_total(&self, _total: u64) {}
    fn add(&self, _name: &str) {}
    async fn start(&self, _stop: CancellationToken) {}
    fn clear(&self) {}
}

/// Convenience type alias for a shared, thread-safe progress listener.
pub type SharedProgressListener = Arc<dyn ProgressListener>;

/// Returns a shared instance of a `NoOpProgressListener`.
pub fn no_op_progress_listener() -> SharedProgressListener {
    Arc::new(NoOpProgressListener)
}
