use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::debug;
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinError;
use yuuka_common::item::{is_plain_file_name, Item};

use crate::error::DownloaderError;
use crate::existence::exists;
use crate::progress::SharedProgressListener;
use crate::transfer::SharedTransfer;

use super::fatal::FirstError;

/// Outcome of a single download task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitStatus {
    /// File was already present in the output dir or in one of the check dirs.
    Found,
    /// File was transferred.
    Downloaded,
    /// Unusable file name or failed transfer. The error went to the shared slot.
    Failed,
}

/// State shared by the download tasks of one operation.
pub(super) struct UnitContext {
    output_dir: PathBuf,
    check_dirs: Vec<PathBuf>,
    transfer: SharedTransfer,
    progress: SharedProgressListener,
    pub(super) fatal: FirstError<DownloaderError>,
    pub(super) found: AtomicU64,
    pub(super) downloaded: AtomicU64,
}

impl UnitContext {
    pub(super) fn new(
        output_dir: PathBuf,
        check_dirs: Vec<PathBuf>,
        transfer: SharedTransfer,
        progress: SharedProgressListener,
    ) -> Self {
        Self {
            output_dir,
            check_dirs,
            transfer,
            progress,
            fatal: FirstError::default(),
            found: AtomicU64::new(0),
            downloaded: AtomicU64::new(0),
        }
    }

    /// Handles one item while holding `permit`.
    ///
    /// The permit lives inside this future, so the slot goes back to the budget however the task
    /// ends, panics included.
    pub(super) async fn run(self: Arc<Self>, item: Item, permit: OwnedSemaphorePermit) {
        let status = self.process(&item).await;
        debug!("Post {} ({}) finished as {:?}", item.id, item.file_name, status);
        drop(permit);
    }

    async fn process(&self, item: &Item) -> UnitStatus {
        if !is_plain_file_name(&item.file_name) {
            self.fatal.try_set(DownloaderError::UnsafeFileName {
                name: item.file_name.clone(),
            });
            return UnitStatus::Failed;
        }

        if exists(&item.file_name, &self.output_dir, &self.check_dirs).await {
            self.found.fetch_add(1, Ordering::SeqCst);
            self.progress.add(&item.file_name);
            return UnitStatus::Found;
        }

        let destination = self.output_dir.join(&item.file_name);

        match self.transfer.transfer(&item.url, &destination).await {
            Ok(()) => {
                self.downloaded.fetch_add(1, Ordering::SeqCst);
                self.progress.add(&item.file_name);
                UnitStatus::Downloaded
            }
            Err(error) => {
                self.fatal.try_set(error.into());
                UnitStatus::Failed
            }
        }
    }

    /// Records the result of joining a finished task. A panicked task is fatal.
    pub(super) fn record_join(&self, joined: Result<(), JoinError>) {
        if let Err(error) = joined {
            self.fatal.try_set(error.into());
        }
    }
}
