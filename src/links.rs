//! Link harvesting from HTML and plain-text bodies

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static TEXT_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

/// Collect every `<a href>` value from an HTML document, verbatim and in order.
///
/// Empty hrefs are skipped. No filtering or deduplication happens here.
#[must_use]
pub fn harvest_page_hrefs(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Collect every `http://` or `https://` run of non-whitespace from text
#[must_use]
pub fn harvest_text_urls(text: &str) -> Vec<String> {
    TEXT_URL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Check if a link must never be fetched (`mailto:` or an in-page anchor)
#[must_use]
pub fn is_excluded_link(link: &str) -> bool {
    let bytes = link.as_bytes();
    link.starts_with('#') || (bytes.len() >= 7 && bytes[..7].eq_ignore_ascii_case(b"mailto:"))
}

/// Harvest candidate links from the email bodies.
///
/// HTML anchors come first, then URLs found in the plain text. Links are
/// unique by exact string and keep first-seen order; `mailto:` and `#`
/// links are removed.
#[must_use]
pub fn harvest_links(html: Option<&str>, text: Option<&str>) -> Vec<String> {
    let from_html = html.map(harvest_page_hrefs).unwrap_or_default();
    let from_text = text.map(harvest_text_urls).unwrap_or_default();

    let mut seen = HashSet::new();
    let links: Vec<String> = from_html
        .into_iter()
        .chain(from_text)
        .filter(|link| seen.insert(link.clone()))
        .filter(|link| !is_excluded_link(link))
        .collect();

    tracing::debug!(count = links.len(), "Harvested body links");
    links
}
