//! HTML extractor
//!
//! Fetches a page, keeps the raw HTML as the payload, and extracts the
//! outbound links to follow.
//!
//! # Link extraction rules
//!
//! **Include:** `<a href="...">` anywhere in the document, resolved against
//! the final URL after redirects.
//!
//! **Exclude:** `javascript:`, `mailto:`, `tel:` and `data:` links,
//! fragment-only anchors, `<a download>` links, and anything that does not
//! resolve to an http(s) URL.

use crate::config::FetcherConfig;
use crate::extract::{
    accept_url, build_http_client, fetch_page, ExtractResult, Extractor, FetchResult,
};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// Payload of the HTML extractor: the page title and the raw markup
#[derive(Debug, Clone, Serialize)]
pub struct HtmlPage {
    pub title: Option<String>,
    pub html: String,
}

/// Extractor for raw HTML pages
pub struct HtmlExtractor {
    client: Client,
    max_url_length: usize,
}

impl HtmlExtractor {
    /// Creates an HTML extractor with its own HTTP client
    pub fn new(config: &FetcherConfig) -> ExtractResult<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            max_url_length: config.max_url_length,
        })
    }

    /// Creates an HTML extractor around an existing client
    pub fn with_client(client: Client, max_url_length: usize) -> Self {
        Self {
            client,
            max_url_length,
        }
    }
}

#[async_trait]
impl Extractor for HtmlExtractor {
    type Payload = HtmlPage;

    async fn extract(&self, url: &str) -> ExtractResult<Option<FetchResult<HtmlPage>>> {
        let Some(parsed) = accept_url(url, self.max_url_length) else {
            return Ok(None);
        };

        let Some(fetched) = fetch_page(&self.client, parsed).await? else {
            return Ok(None);
        };

        let page = parse_page(&fetched.body, &fetched.final_url);

        Ok(Some(FetchResult {
            url: url.to_string(),
            outlinks: page.links,
            payload: HtmlPage {
                title: page.title,
                html: fetched.body,
            },
        }))
    }
}

/// Title and links pulled out of one HTML document
pub(crate) struct ParsedPage {
    pub title: Option<String>,
    pub links: HashSet<String>,
}

/// Parses HTML content and extracts the title and outbound links
pub(crate) fn parse_page(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all followable links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> HashSet<String> {
    let mut links = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.insert(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
