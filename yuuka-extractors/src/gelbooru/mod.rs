//! Page source for Gelbooru
//!
//! Talks to the JSON flavor of the `dapi` post index:
//! `https://gelbooru.com/index.php?page=dapi&s=post&q=index&json=1`
//!
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use tokio::time::Instant;
use yuuka_common::item::{is_plain_file_name, Item, Page, Query};

use crate::error::ExtractorError;
use crate::page_source::PageSource;

use self::models::GelbooruResponse;

mod models;

pub const GELBOORU_ENDPOINT: &str = "https://gelbooru.com/index.php";

/// Credentials forwarded as is to the API.
#[derive(Debug, Clone, Default)]
pub struct GelbooruOptions {
    pub api_key: Option<String>,
    pub user_id: Option<u64>,
}

pub struct GelbooruApi {
    client: Client,
    endpoint: String,
    options: GelbooruOptions,
}

impl GelbooruApi {
    pub fn new(client: Client, options: GelbooruOptions) -> Self {
        Self {
            client,
            endpoint: GELBOORU_ENDPOINT.to_string(),
            options,
        }
    }

    /// Points the source to another Gelbooru-compatible `index.php`.
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn query_params(&self, query: &Query, page: usize, limit: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", "dapi".to_string()),
            ("s", "post".to_string()),
            ("q", "index".to_string()),
            ("json", "1".to_string()),
            ("tags", query.tags.clone()),
            ("pid", page.to_string()),
        ];

        if limit != 0 {
            params.push(("limit", limit.to_string()));
        }

        if let Some(key) = self.options.api_key.as_ref().filter(|k| !k.is_empty()) {
            params.push(("api_key", key.clone()));
        }

        if let Some(id) = self.options.user_id.filter(|id| *id != 0) {
            params.push(("user_id", id.to_string()));
        }

        params
    }

    fn map_page(response: GelbooruResponse, page: usize) -> Page {
        let start = Instant::now();
        let listed = response.post.len();

        let items: Vec<Item> = response
            .post
            .into_iter()
            .filter_map(|post| {
                let Some(url) = post.file_url else {
                    debug!("Post {} has no file url, ignoring", post.id);
                    return None;
                };

                if !is_plain_file_name(&post.image) {
                    warn!("Post {} has an unusable file name {:?}, ignoring", post.id, post.image);
                    return None;
                }

                Some(Item {
                    id: post.id,
                    file_name: post.image,
                    url,
                })
            })
            .collect();

        debug!("List size: {} of {}", items.len(), listed);
        debug!("Post mapping took {:?}", start.elapsed());

        Page {
            items,
            total: (page == 0).then_some(response.attributes.count),
            listed,
        }
    }
}

#[async_trait]
impl PageSource for GelbooruApi {
    async fn fetch(
        &self,
        query: &Query,
        page: usize,
        limit: usize,
    ) -> Result<Page, ExtractorError> {
        let res = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(query, page, limit))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ExtractorError::Upstream {
                status: res.status(),
            });
        }

        let body = res.bytes().await?;
        let response: GelbooruResponse = serde_json::from_slice(&body)?;

        Ok(Self::map_page(response, page))
    }
}
