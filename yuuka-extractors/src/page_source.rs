use async_trait::async_trait;
use std::sync::Arc;
use yuuka_common::item::{Page, Query};

use crate::error::ExtractorError;

/// Remote paginated search.
///
/// Implementations must not retry: every failure is returned as is, and the downloader decides
/// what to do with it.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches page `page` (starting at `0`) of the results for `query`.
    ///
    /// `limit` set to `0` uses the server's default page size. Any other value asks for exactly
    /// that many items, which is used once with `page = 0` to learn the total count cheaply.
    async fn fetch(&self, query: &Query, page: usize, limit: usize)
        -> Result<Page, ExtractorError>;
}

/// Convenience type alias for a page source shared with the downloader.
pub type SharedPageSource = Arc<dyn PageSource>;
