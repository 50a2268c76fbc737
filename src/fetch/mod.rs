mod basic;
mod client;
mod retry;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use retry::Retry;

use anyhow::Result;
use tracing::debug;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Fetches `url` and decodes the body as UTF-8, whatever charset the server
/// declares. Invalid sequences are replaced rather than rejected.
pub async fn fetch_text<C: HttpClient>(client: &C, url: &str) -> Result<String> {
    let bytes = fetch_bytes(client, url).await?;
    debug!(url, bytes = bytes.len(), "Page downloaded");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
