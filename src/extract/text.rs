//! Plain-text extractor
//!
//! Same fetch and link pass as the HTML extractor, but the payload is the
//! tag-stripped visible text of the page instead of the raw markup.

use crate::config::FetcherConfig;
use crate::extract::html::parse_page;
use crate::extract::{
    accept_url, build_http_client, fetch_page, ExtractResult, Extractor, FetchResult,
};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

/// Extractor yielding the visible text of a page
pub struct PlainTextExtractor {
    client: Client,
    max_url_length: usize,
}

impl PlainTextExtractor {
    /// Creates a plain-text extractor with its own HTTP client
    pub fn new(config: &FetcherConfig) -> ExtractResult<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            max_url_length: config.max_url_length,
        })
    }

    /// Creates a plain-text extractor around an existing client
    pub fn with_client(client: Client, max_url_length: usize) -> Self {
        Self {
            client,
            max_url_length,
        }
    }
}

#[async_trait]
impl Extractor for PlainTextExtractor {
    type Payload = String;

    async fn extract(&self, url: &str) -> ExtractResult<Option<FetchResult<String>>> {
        let Some(parsed) = accept_url(url, self.max_url_length) else {
            return Ok(None);
        };

        let Some(fetched) = fetch_page(&self.client, parsed).await? else {
            return Ok(None);
        };

        let page = parse_page(&fetched.body, &fetched.final_url);
        let text = visible_text(&fetched.body);

        Ok(Some(FetchResult {
            url: url.to_string(),
            outlinks: page.links,
            payload: text,
        }))
    }
}

/// Strips markup and returns the whitespace-normalized visible text
pub(crate) fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    let scope = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());
    collect_text(scope, &mut raw);

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collects text nodes, skipping subtrees that are never rendered
fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            if !matches!(el.value().name(), "script" | "style" | "noscript") {
                collect_text(el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}
