use serde::Deserialize;

/// Only the parts of the `dapi` response the downloader needs.
#[derive(Debug, Deserialize)]
pub struct GelbooruResponse {
    #[serde(rename = "@attributes")]
    pub attributes: GelbooruAttributes,
    #[serde(default)]
    pub post: Vec<GelbooruPost>,
}

#[derive(Debug, Deserialize)]
pub struct GelbooruAttributes {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct GelbooruPost {
    pub id: u64,
    #[serde(default)]
    pub image: String,
    pub file_url: Option<String>,
}
