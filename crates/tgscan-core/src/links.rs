//! Telegram link extraction and group classification over fetched HTML.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::{ports::PageFetcher, Result};

/// Prefix of public Telegram permalinks.
pub const TELEGRAM_LINK_PREFIX: &str = "https://t.me/";

/// Deep link Telegram renders only on joinable group pages.
pub const JOIN_LINK_PREFIX: &str = "tg://join?";

/// Opening `<a ...>` tag; group 1 is the attribute list.
///
/// Quoted values are consumed whole, so `>` or `href=` inside them does not
/// end the tag or start a new attribute.
fn anchor_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?is)<a((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*/?>"#,
        )
        .expect("valid regex")
    })
}

/// One attribute: name, then an optional double-quoted, single-quoted or bare value.
fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
            .expect("valid regex")
    })
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn href_attribute(attrs: &str) -> Option<String> {
    attribute_re()
        .captures_iter(attrs)
        .find(|caps| caps[1].eq_ignore_ascii_case("href"))
        .and_then(|caps| {
            caps.get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str().trim()))
        })
}

/// `href` values of every `<a>` element, in document order.
///
/// Anchors without an `href` are skipped.
pub fn parse_anchor_hrefs(html: &str) -> Vec<String> {
    anchor_tag_re()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).and_then(|attrs| href_attribute(attrs.as_str())))
        .collect()
}

/// Anchors pointing at `https://t.me/...`, in document order.
pub fn group_links_in(html: &str) -> Vec<String> {
    parse_anchor_hrefs(html)
        .into_iter()
        .filter(|href| href.starts_with(TELEGRAM_LINK_PREFIX))
        .collect()
}

/// Whether the page carries a `tg://join?` anchor.
pub fn has_join_link(html: &str) -> bool {
    parse_anchor_hrefs(html)
        .iter()
        .any(|href| href.starts_with(JOIN_LINK_PREFIX))
}

/// Fetches pages and classifies the Telegram links found in them.
///
/// Fetch failures are returned to the caller as-is; nothing is retried.
#[derive(Clone)]
pub struct LinkScanner {
    fetcher: Arc<dyn PageFetcher>,
}

impl LinkScanner {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Telegram links found on `page_url`.
    pub async fn extract_group_links(&self, page_url: &str) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(page_url).await?;
        let links = group_links_in(&html);
        tracing::debug!(page = page_url, found = links.len(), "scanned page for telegram links");
        Ok(links)
    }

    /// Whether `link` resolves to a joinable group page.
    pub async fn is_group_link(&self, link: &str) -> Result<bool> {
        let html = self.fetcher.fetch(link).await?;
        let is_group = has_join_link(&html);
        tracing::debug!(link, is_group, "classified telegram link");
        Ok(is_group)
    }
}
