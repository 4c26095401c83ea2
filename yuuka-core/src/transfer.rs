//! Streams a single remote file to disk.
use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use log::debug;
use reqwest::Client;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::TransferError;

/// Moves the bytes behind `url` into `destination`.
///
/// A transfer is never retried. If it fails halfway, whatever was already written stays on disk.
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn transfer(&self, url: &str, destination: &Path) -> Result<(), TransferError>;
}

/// Convenience type alias for a transfer worker shared by every download task.
pub type SharedTransfer = Arc<dyn Transfer>;

/// Plain HTTP(S) transfer built on a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransfer {
    client: Client,
}

impl HttpTransfer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transfer for HttpTransfer {
    async fn transfer(&self, url: &str, destination: &Path) -> Result<(), TransferError> {
        debug!("Fetching {}", url);
        let res = self.client.get(url).send().await?;

        if !res.status().is_success() {
            return Err(TransferError::Upstream {
                status: res.status(),
                url: url.to_string(),
            });
        }

        let write_error = |source: io::Error| TransferError::Write {
            path: destination.to_path_buf(),
            source,
        };

        debug!("Creating {:?}", destination);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(destination)
            .await
            .map_err(write_error)?;

        let mut bw = BufWriter::new(file);

        // Download the file chunk by chunk.
        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let mut chunk = item?;
            bw.write_all_buf(&mut chunk).await.map_err(write_error)?;
        }

        bw.flush().await.map_err(write_error)?;

        debug!("Finished downloading {}", destination.display());
        Ok(())
    }
}
