// Public Exports
pub use directories;
pub use log;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;

pub mod item;

/// User agent sent with every request, following the version declared inside `Cargo.toml`.
pub const USER_AGENT: &str = concat!("yuukafetch/", env!("CARGO_PKG_VERSION"));

/// Builds the `reqwest::Client` shared by the page source and the transfer workers.
#[inline]
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    log::debug!("Using user-agent: {}", USER_AGENT);
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}
