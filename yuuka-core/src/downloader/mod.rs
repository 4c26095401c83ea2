//! Provides the core asynchronous downloader.
//!
//! This module contains the [`Downloader`](crate::downloader::Downloader) struct, the central
//! component of a download operation. It walks the pages of a search one by one, hands every item
//! to a bounded pool of download tasks, keeps the first fatal error, and never returns before every
//! task it started is done.
//!
//! # Example usage
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use yuuka_common::item::Query;
//! use yuuka_core::CancellationToken;
//! use yuuka_core::downloader::{Downloader, DownloaderOpts};
//! use yuuka_core::transfer::HttpTransfer;
//! use yuuka_extractors::prelude::*;
//!
//! async fn download_yuuka() {
//!     let client = yuuka_common::build_client().unwrap();
//!
//!     let source = Arc::new(GelbooruApi::new(client.clone(), GelbooruOptions::default()));
//!     let transfer = Arc::new(HttpTransfer::new(client));
//!
//!     let opts = DownloaderOpts {
//!         output_dir: PathBuf::from("./yuuka"),
//!         check_dirs: vec![PathBuf::from("./picked")],
//!         concurrency: 5,
//!     };
//!
//!     let downloader = Downloader::new(source, transfer, opts, None);
//!
//!     // Skip everything a previous run already went through
//!     let query = Query::new("hayase_yuuka").with_cutoff(8_000_000);
//!
//!     let summary = downloader
//!         .download(&query, &CancellationToken::new())
//!         .await
//!         .unwrap();
//!
//!     println!("{} files downloaded", summary.downloaded);
//! }
//! ```
mod fatal;
mod unit;

pub use self::fatal::FirstError;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use log::{debug, info, warn};
use tokio::spawn;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use yuuka_common::item::{Page, Query};
use yuuka_extractors::page_source::SharedPageSource;

use crate::error::DownloaderError;
use crate::progress::{SharedProgressListener, no_op_progress_listener};
use crate::transfer::SharedTransfer;

use self::unit::UnitContext;

/// Options for one download operation.
#[derive(Debug, Clone)]
pub struct DownloaderOpts {
    /// Where new files are written. Must already exist.
    pub output_dir: PathBuf,
    /// Extra directories searched for already downloaded files.
    pub check_dirs: Vec<PathBuf>,
    /// Max number of items being checked or transferred at the same time.
    pub concurrency: usize,
}

/// Why the enumeration stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page listing no posts was reached.
    Exhausted,
    /// An item at or below the query cutoff was reached.
    Cutoff,
    /// Cancellation was requested from outside.
    Cancelled,
}

/// Result of a download operation that didn't hit a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Total count hint given by the API. Approximate, the cutoff is not discounted from it.
    pub total: u64,
    /// Items handed to a download task.
    pub dispatched: u64,
    /// Items skipped because they were already on disk.
    pub found: u64,
    /// Items transferred.
    pub downloaded: u64,
    pub stop: StopReason,
}

impl DownloadSummary {
    /// Items that reached a terminal, non-error outcome.
    #[inline]
    pub const fn completed(&self) -> u64 {
        self.found + self.downloaded
    }
}

/// Drives a download operation from the first page to the last finished task.
pub struct Downloader {
    source: SharedPageSource,
    transfer: SharedTransfer,
    opts: DownloaderOpts,
    progress_listener: SharedProgressListener,
}

impl Downloader {
    /// Set up the downloader.
    ///
    /// Without a `progress_listener`, progress is not displayed at all.
    pub fn new(
        source: SharedPageSource,
        transfer: SharedTransfer,
        opts: DownloaderOpts,
        progress_listener: Option<SharedProgressListener>,
    ) -> Self {
        let mut opts = opts;
        if opts.concurrency == 0 {
            warn!("Concurrency must be at least 1, using a single download task");
            opts.concurrency = 1;
        }

        Self {
            source,
            transfer,
            opts,
            progress_listener: progress_listener.unwrap_or_else(no_op_progress_listener),
        }
    }

    /// Downloads every item matching `query`.
    ///
    /// # Behavior
    /// Pages are fetched strictly one after the other. Each item of a page waits for a free slot in
    /// the concurrency budget, then runs in its own task: if the file already exists it's counted
    /// as found, otherwise it's transferred. Items finish in no particular order.
    ///
    /// The enumeration stops on a page listing no posts, on the first item at or below the query
    /// cutoff, on the first fatal error (page fetch or transfer) or when `cancel` is cancelled.
    /// Whatever the reason, every task already started is awaited and the progress display is
    /// stopped before this returns.
    ///
    /// # Returns
    /// The first fatal error observed, otherwise a [`DownloadSummary`]. Cancellation is not an
    /// error: it shows up as [`StopReason::Cancelled`].
    pub async fn download(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> Result<DownloadSummary, DownloaderError> {
        // Only used to learn the total count.
        let priming = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Cancellation requested before the first page, aborting");
                return Ok(DownloadSummary {
                    total: 0,
                    dispatched: 0,
                    found: 0,
                    downloaded: 0,
                    stop: StopReason::Cancelled,
                });
            }
            page = self.source.fetch(query, 0, 1) => page?,
        };
        let total = priming.total.unwrap_or_default();
        info!("Total count is {}", total);

        self.progress_listener.set_total(total);

        let progress_stop = CancellationToken::new();
        let progress_task = spawn({
            let listener = self.progress_listener.clone();
            let stop = progress_stop.clone();
            async move { listener.start(stop).await }
        });

        let ctx = Arc::new(UnitContext::new(
            self.opts.output_dir.clone(),
            self.opts.check_dirs.clone(),
            self.transfer.clone(),
            self.progress_listener.clone(),
        ));
        let budget = Arc::new(Semaphore::new(self.opts.concurrency));
        let mut units = JoinSet::new();
        let mut dispatched = 0;

        let stop = self
            .enumerate(query, cancel, &ctx, &budget, &mut units, &mut dispatched)
            .await;

        debug!("Waiting for {} download tasks to finish", units.len());
        while let Some(joined) = units.join_next().await {
            ctx.record_join(joined);
        }

        progress_stop.cancel();
        if let Err(error) = progress_task.await {
            warn!("Progress display task failed: {}", error);
        }

        if let Some(error) = ctx.fatal.take() {
            return Err(error);
        }

        let summary = DownloadSummary {
            total,
            dispatched,
            found: ctx.found.load(Ordering::SeqCst),
            downloaded: ctx.downloaded.load(Ordering::SeqCst),
            // `None` only comes with a stored error, handled above.
            stop: stop.unwrap_or(StopReason::Exhausted),
        };

        info!(
            "Finished: {} found, {} downloaded, {} dispatched ({:?})",
            summary.found, summary.downloaded, summary.dispatched, summary.stop
        );

        Ok(summary)
    }

    /// Walks the pages and dispatches their items.
    ///
    /// Returns `None` when it stopped on a fatal error, which is then stored in `ctx.fatal`.
    async fn enumerate(
        &self,
        query: &Query,
        cancel: &CancellationToken,
        ctx: &Arc<UnitContext>,
        budget: &Arc<Semaphore>,
        units: &mut JoinSet<()>,
        dispatched: &mut u64,
    ) -> Option<StopReason> {
        let mut page_index = 0;

        loop {
            if let Some(stop) = Self::interrupted(cancel, ctx, units) {
                return stop;
            }

            info!("Fetching page {}", page_index + 1);
            let page = match self.fetch_page(query, page_index, cancel).await {
                Ok(page) => page,
                Err(DownloaderError::Aborted) => return Some(StopReason::Cancelled),
                Err(error) => {
                    ctx.fatal.try_set(error);
                    return None;
                }
            };

            if page.is_end() {
                info!("Reached an empty page, finishing");
                return Some(StopReason::Exhausted);
            }

            if page.is_empty() {
                info!("Page {} had no usable posts, moving on", page_index + 1);
            }

            for item in page.items {
                if query.reached_cutoff(item.id) {
                    info!("Reached post {}, at or below the cutoff, finishing", item.id);
                    return Some(StopReason::Cutoff);
                }

                if let Some(stop) = Self::interrupted(cancel, ctx, units) {
                    return stop;
                }

                let permit = match Self::acquire_slot(budget, cancel).await {
                    Ok(permit) => permit,
                    Err(_) => return Some(StopReason::Cancelled),
                };

                // A task may have failed while we were waiting for its slot.
                if ctx.fatal.is_set() {
                    return None;
                }

                debug!("Dispatching post {} ({})", item.id, item.file_name);
                units.spawn(ctx.clone().run(item, permit));
                *dispatched += 1;
            }

            page_index += 1;
        }
    }

    /// Reaps finished tasks, then reports whether enumeration must stop.
    ///
    /// `Some(None)` means a fatal error is pending, `Some(Some(Cancelled))` means cancellation.
    fn interrupted(
        cancel: &CancellationToken,
        ctx: &UnitContext,
        units: &mut JoinSet<()>,
    ) -> Option<Option<StopReason>> {
        while let Some(joined) = units.try_join_next() {
            ctx.record_join(joined);
        }

        if ctx.fatal.is_set() {
            debug!("A download task failed, aborting");
            return Some(None);
        }

        if cancel.is_cancelled() {
            info!("Cancellation requested, aborting");
            return Some(Some(StopReason::Cancelled));
        }

        None
    }

    async fn fetch_page(
        &self,
        query: &Query,
        page_index: usize,
        cancel: &CancellationToken,
    ) -> Result<Page, DownloaderError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(DownloaderError::Aborted),
            page = self.source.fetch(query, page_index, 0) => Ok(page?),
        }
    }

    /// Waits for a free slot in the budget. This is where the enumeration blocks when every slot
    /// is busy.
    async fn acquire_slot(
        budget: &Arc<Semaphore>,
        cancel: &CancellationToken,
    ) -> Result<OwnedSemaphorePermit, DownloaderError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(DownloaderError::Aborted),
            permit = budget.clone().acquire_owned() => permit.map_err(|_| DownloaderError::Aborted),
        }
    }
}
