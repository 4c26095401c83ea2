use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while fetching a page of results.
///
/// None of them are retried by the page source, they are all surfaced to the caller.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The request never got a response (DNS failure, refused connection, broken stream, etc).
    #[error("Connection Error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered, but with a non-success status.
    #[error("Imageboard returned status {status}")]
    Upstream { status: StatusCode },

    /// The body could not be decoded into a page of posts.
    #[error("Error while deserializing JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
