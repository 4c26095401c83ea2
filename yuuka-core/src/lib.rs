//! Download infrastructure for yuukafetch.
//!
//! The [`Downloader`](downloader::Downloader) walks every page of a search, checks whether each
//! item is already on disk and transfers the missing ones with a bounded number of simultaneous
//! downloads, reporting progress through a [`ProgressListener`](progress::ProgressListener).
pub mod downloader;
pub mod error;
pub mod existence;
pub mod progress;
pub mod progress_bars;
pub mod transfer;

pub use tokio_util::sync::CancellationToken;
