//! Extraction capabilities
//!
//! An [`Extractor`] turns one URL into zero or one [`FetchResult`], possibly
//! discovering further URLs along the way. Concrete variants are independent
//! implementations selected at construction time; the engine only sees the
//! trait.

mod html;
mod text;

pub use html::{HtmlExtractor, HtmlPage};
pub use text::PlainTextExtractor;

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by an extractor for a single URL
///
/// These never abort a crawl: the engine's task wrapper logs them once and
/// treats the URL as yielding nothing. The only exception is `Client`,
/// which occurs while building an extractor, before any crawl starts.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("HTTP request failed for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// One extracted document: the URL it came from, the URLs it links to,
/// and the extractor-specific payload
///
/// Created once by an extractor invocation, consumed once by the engine,
/// then discarded. An empty `outlinks` set marks a leaf document.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult<P> {
    /// The URL this result was extracted from
    pub url: String,

    /// Newly discovered URLs, unique within this result
    pub outlinks: HashSet<String>,

    /// Extractor-specific content
    pub payload: P,
}

/// Pluggable extraction capability
///
/// `extract` may perform network I/O; it must report problems through its
/// return value rather than panicking. `Ok(None)` means the URL was
/// declined (wrong scheme, wrong content type, too long): not an error,
/// just nothing to write.
#[async_trait]
pub trait Extractor: Send + Sync {
    type Payload: Send + 'static;

    async fn extract(&self, url: &str) -> ExtractResult<Option<FetchResult<Self::Payload>>>;
}

/// Builds the HTTP client shared by the fetching extractors
pub fn build_http_client(config: &FetcherConfig) -> ExtractResult<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(ExtractError::Client)
}

/// Checks whether a URL is worth a request at all.
///
/// Only absolute http(s) URLs within the length bound are accepted;
/// everything else is declined without touching the network.
pub(crate) fn accept_url(url: &str, max_url_length: usize) -> Option<Url> {
    if url.len() > max_url_length {
        return None;
    }
    match Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Some(parsed),
        _ => None,
    }
}

/// A fetched page body together with the URL it ended up at after redirects
pub(crate) struct FetchedBody {
    pub final_url: Url,
    pub body: String,
}

/// Fetches one page and returns its decoded body.
///
/// Non-success statuses are errors (logged by the task wrapper); a
/// non-HTML content type declines the URL with `Ok(None)`.
pub(crate) async fn fetch_page(client: &Client, url: Url) -> ExtractResult<Option<FetchedBody>> {
    let url_str = url.to_string();

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ExtractError::Http {
            url: url_str.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::Status {
            url: url_str,
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.is_empty()
        && !content_type.contains("text/html")
        && !content_type.contains("application/xhtml")
    {
        tracing::debug!("Skipping {} with content type {}", url_str, content_type);
        return Ok(None);
    }

    let final_url = response.url().clone();
    let body = response
        .text()
        .await
        .map_err(|source| ExtractError::Body {
            url: url_str,
            source,
        })?;

    Ok(Some(FetchedBody { final_url, body }))
}
