//! Link resolver: fetch one body link and classify what comes back

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::chaser::PageLinkChaser;
use crate::error::LinkError;
use crate::http::{HttpClient, HttpResponse};
use crate::types::{Extraction, ExtractionSource};

/// What a fetched link turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseClass {
    /// A JSON document, ready to return
    Json(Value),
    /// An HTML page that may link onward to JSON
    Html(String),
    /// Anything else
    Irrelevant,
}

/// Classify a response.
///
/// Only status 200 is considered. A declared `application/json` body must
/// parse; otherwise a body that parses to an object or array is JSON
/// whatever its declared type. Remaining `text/html` bodies are pages.
pub fn classify_response(response: &HttpResponse) -> Result<ResponseClass, LinkError> {
    if !response.is_ok() {
        return Err(LinkError::Status(response.status));
    }

    let text = response.text();
    let body = text.trim_start_matches('\u{feff}');

    if response.content_type_contains("application/json") {
        return serde_json::from_str(body)
            .map(ResponseClass::Json)
            .map_err(|e| LinkError::InvalidJson(e.to_string()));
    }

    if let Some(value) = sniff_structured(body) {
        return Ok(ResponseClass::Json(value));
    }

    if response.content_type_contains("text/html") {
        return Ok(ResponseClass::Html(text.into_owned()));
    }

    Ok(ResponseClass::Irrelevant)
}

/// Parse a body only if it holds an object or array
fn sniff_structured(body: &str) -> Option<Value> {
    let first = body.trim_start().chars().next()?;
    if first != '{' && first != '[' {
        return None;
    }
    serde_json::from_str::<Value>(body)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}

/// Resolves harvested body links one at a time
pub struct LinkResolver<'a> {
    client: &'a dyn HttpClient,
    timeout: Duration,
}

impl<'a> LinkResolver<'a> {
    #[must_use]
    pub const fn new(client: &'a dyn HttpClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetch and classify a single link
    pub async fn fetch_classified(&self, url: &str) -> Result<ResponseClass, LinkError> {
        let response = self.client.get(url, self.timeout).await?;
        classify_response(&response)
    }

    /// Resolve one body link to JSON, chasing one hop through HTML pages.
    ///
    /// Every failure is a non-match; nothing here aborts the request.
    #[instrument(skip(self))]
    pub async fn resolve(&self, link: &str) -> Option<Extraction> {
        match self.fetch_classified(link).await {
            Ok(ResponseClass::Json(value)) => {
                debug!("Link returned JSON");
                Some(Extraction::new(
                    value,
                    ExtractionSource::DirectLink {
                        url: link.to_string(),
                    },
                ))
            }
            Ok(ResponseClass::Html(page)) => {
                debug!("Link returned HTML, chasing page links");
                PageLinkChaser::new(self.client, self.timeout)
                    .chase(&page, link)
                    .await
            }
            Ok(ResponseClass::Irrelevant) => {
                debug!("Link returned neither JSON nor HTML");
                None
            }
            Err(e) => {
                debug!(error = %e, "Link did not resolve");
                None
            }
        }
    }

    /// Try links in order and stop at the first that yields JSON
    pub async fn resolve_first(&self, links: &[String]) -> Option<Extraction> {
        for link in links {
            if let Some(found) = self.resolve(link).await {
                return Some(found);
            }
        }
        None
    }
}
