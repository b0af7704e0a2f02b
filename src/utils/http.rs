// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::Result;
use crate::models::CrawlerConfig;
use crate::utils::charset::charset_param;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// A response body as received, with the charset its headers declare.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub bytes: Vec<u8>,
    pub charset: Option<String>,
}

/// Fetch a page body without decoding it.
///
/// The commission site serves windows-1251; the bytes are kept as sent so
/// record fingerprints cover the raw content.
pub async fn fetch_page_async(client: &reqwest::Client, url: &str) -> Result<FetchedBody> {
    let response = client.get(url).send().await?.error_for_status()?;
    let charset = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(charset_param);
    let bytes = response.bytes().await?.to_vec();
    Ok(FetchedBody { bytes, charset })
}
