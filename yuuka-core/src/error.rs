use std::{io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;
use tokio::task::JoinError;
use yuuka_extractors::error::ExtractorError;

/// Errors raised while transferring a single file.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to connect to download URL: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Image source {url} returned status {status}")]
    Upstream { status: StatusCode, url: String },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Errors that stop a whole download operation.
#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum DownloaderError {
    #[error("Failed to fetch page: {source}")]
    Page {
        #[from]
        source: ExtractorError,
    },

    #[error("Failed to download file: {source}")]
    Transfer {
        #[from]
        source: TransferError,
    },

    #[error("Download task failed to execute: {source}")]
    WorkerPanic {
        #[from]
        source: JoinError,
    },

    #[error("Refusing to save {name:?} outside of the output directory")]
    UnsafeFileName { name: String },

    /// Raised inside the dispatch loop when cancellation wins over a pending wait. Cancellation is
    /// a requested stop, so this never leaves [`Downloader::download`](crate::downloader::Downloader::download).
    #[error("Download was cancelled")]
    Aborted,
}

impl DownloaderError {
    /// Whether the error comes from writing into a directory that does not exist, the most
    /// common misconfiguration.
    pub fn is_missing_directory(&self) -> bool {
        matches!(
            self,
            Self::Transfer {
                source: TransferError::Write { source, .. }
            } if source.kind() == io::ErrorKind::NotFound
        )
    }
}
