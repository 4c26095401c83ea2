//! Page sources for the yuukafetch downloader.
//!
//! A [`PageSource`](page_source::PageSource) turns a [`Query`](yuuka_common::item::Query) and a page
//! index into a [`Page`](yuuka_common::item::Page) of items ready to be downloaded.
pub mod error;
pub mod gelbooru;
pub mod page_source;

pub mod prelude {
    pub use crate::error::ExtractorError;
    pub use crate::gelbooru::{GelbooruApi, GelbooruOptions};
    pub use crate::page_source::{PageSource, SharedPageSource};
}
