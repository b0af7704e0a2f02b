// src/pipeline/extract.rs

//! Single-page extraction, for checking a layout against one page.

use std::path::Path;
use std::sync::Arc;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, Page};
use crate::services::{Handler, Traversal, TraversalOptions, Visit};
use crate::utils::http::{FetchedBody, create_async_client, fetch_page_async};

/// Run `handler` on one page and return what it emits.
///
/// `source` is an `http(s)` URL or a path to a saved page. Saved pages get a
/// `file://` URL, so the links they emit resolve against the file location,
/// and are decoded according to their `<meta>` charset.
pub async fn run_extract(config: &Config, handler: Handler, source: &str) -> Result<Visit> {
    let layout = config.site.layout()?;
    let traversal = Traversal::new(Arc::new(layout), TraversalOptions::from(&config.crawler))?;

    let (url, fetched) = if source.starts_with("http://") || source.starts_with("https://") {
        let client = create_async_client(&config.crawler)?;
        (source.to_string(), fetch_page_async(&client, source).await?)
    } else {
        let path = std::path::absolute(Path::new(source))?;
        let url = Url::from_file_path(&path)
            .map_err(|_| AppError::config(format!("cannot address {} as a URL", path.display())))?;
        let bytes = tokio::fs::read(&path).await?;
        (url.to_string(), FetchedBody { bytes, charset: None })
    };
    log::info!("Running {} on {}", handler, url);

    let page = Page::with_charset(url, fetched.bytes, fetched.charset.as_deref());
    let visit = traversal.visit(handler, &page)?;
    log::info!(
        "{} records, {} follow-up requests",
        visit.records.len(),
        visit.follow_ups.len()
    );
    Ok(visit)
}
