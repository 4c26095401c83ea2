//! Main representation of a search result
//!
//! # Item
//! An [`Item` struct](Item) is the smallest unit of work the downloader handles: one remote file,
//! identified by its post id, with the name it should have once saved.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Component, Path};

/// A tag search that stays the same for the whole download operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Tag expression, passed to the API untouched.
    pub tags: String,
    /// Items with an id at or below this value were handled by a previous run.
    ///
    /// The API returns posts ordered by descending id, so once an item crosses the cutoff every
    /// following item does too.
    pub cutoff: Option<u64>,
}

impl Query {
    pub fn new<S: Into<String>>(tags: S) -> Self {
        Self {
            tags: tags.into(),
            cutoff: None,
        }
    }

    /// Sets the cutoff id. A value of `0` disables it, since no post has id 0.
    pub fn with_cutoff(mut self, cutoff: u64) -> Self {
        self.cutoff = if cutoff == 0 { None } else { Some(cutoff) };
        self
    }

    /// Whether `id` falls at or below the configured cutoff.
    #[inline]
    pub fn reached_cutoff(&self, id: u64) -> bool {
        self.cutoff.is_some_and(|cutoff| id <= cutoff)
    }
}

/// Catchall model for the parts of a post needed to identify, download and save it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// ID number of the post given by the imageboard
    pub id: u64,
    /// Name of the file once saved. Also the key used to detect already downloaded items.
    pub file_name: String,
    /// Direct URL of the original file located inside the imageboard's server
    pub url: String,
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Items in the order the API returned them.
    pub items: Vec<Item>,
    /// Total number of posts matching the query. Only reported for the first page.
    pub total: Option<u64>,
    /// Posts the API listed for this page, including the ones that couldn't become an item.
    pub listed: usize,
}

impl Page {
    /// Page where every listed post became an item.
    pub fn new(items: Vec<Item>, total: Option<u64>) -> Self {
        let listed = items.len();
        Self {
            items,
            total,
            listed,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The API listed nothing for this page, so there are no more pages after it.
    ///
    /// A page can have no items and still not be the last one when all its posts were dropped.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.listed == 0
    }
}

/// Whether `name` can be joined onto a directory without leaving it.
///
/// Only a single plain component is accepted: no separators, no `..`, no root or prefix.
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();

    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
