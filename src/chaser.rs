//! Page link chaser: one hop from an HTML page to a JSON resource

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, instrument};
use url::Url;

use crate::error::LinkError;
use crate::http::HttpClient;
use crate::links::harvest_page_hrefs;
use crate::resolver::{classify_response, ResponseClass};
use crate::types::{Extraction, ExtractionSource};

/// Resolve an href against the page it was found on
pub fn resolve_candidate(base: &Url, href: &str) -> Result<Url, LinkError> {
    base.join(href.trim())
        .map_err(|e| LinkError::InvalidUrl(format!("{href}: {e}")))
}

/// Check if the URL path (query and fragment ignored) ends in `.json`
#[must_use]
pub fn has_json_path(url: &Url) -> bool {
    url.path().to_lowercase().ends_with(".json")
}

/// Absolute, fetchable `.json` URLs linked from a page, in page order
#[must_use]
pub fn json_candidates(page: &str, base: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();

    harvest_page_hrefs(page)
        .into_iter()
        .filter_map(|href| match resolve_candidate(base, &href) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!(error = %e, "Skipping unresolvable page link");
                None
            }
        })
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(has_json_path)
        .filter(|url| seen.insert(url.as_str().to_string()))
        .collect()
}

/// Follows `.json` links found on an intermediate page
pub struct PageLinkChaser<'a> {
    client: &'a dyn HttpClient,
    timeout: Duration,
}

impl<'a> PageLinkChaser<'a> {
    #[must_use]
    pub const fn new(client: &'a dyn HttpClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetch `.json` candidates from `page` in order; first JSON response wins
    #[instrument(skip(self, page), fields(page_url = %page_url))]
    pub async fn chase(&self, page: &str, page_url: &str) -> Option<Extraction> {
        let base = match Url::parse(page_url) {
            Ok(base) => base,
            Err(e) => {
                debug!(error = %e, "Page URL is not absolute, cannot chase");
                return None;
            }
        };

        let candidates = json_candidates(page, &base);
        debug!(count = candidates.len(), "JSON candidates on page");

        for candidate in candidates {
            match self.fetch_json(candidate.as_str()).await {
                Ok(value) => {
                    return Some(Extraction::new(
                        value,
                        ExtractionSource::ChasedLink {
                            page: page_url.to_string(),
                            url: candidate.to_string(),
                        },
                    ));
                }
                Err(e) => debug!(candidate = %candidate, error = %e, "Candidate rejected"),
            }
        }

        None
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, LinkError> {
        let response = self.client.get(url, self.timeout).await?;
        match classify_response(&response)? {
            ResponseClass::Json(value) => Ok(value),
            ResponseClass::Html(_) | ResponseClass::Irrelevant => Err(LinkError::InvalidJson(
                "response is not JSON".to_string(),
            )),
        }
    }
}
