//! HTTP client used to follow links.
//!
//! The resolver and chaser only see the [`HttpClient`] trait, so tests can
//! substitute an in-memory client. [`ReqwestClient`] is the real transport.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, redirect, Client};
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{ExtractError, LinkError};

// ============================================================================
// Response
// ============================================================================

/// Response from a single GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Final URL after any transport-level redirects.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Content-Type header, if present.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Builds a response, mostly useful for tests and fakes.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        status: u16,
        content_type: Option<&str>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// True only for status 200; redirects and other 2xx codes do not count.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Case-insensitive substring match against the Content-Type header.
    #[must_use]
    pub fn content_type_contains(&self, needle: &str) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_lowercase().contains(needle))
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

// ============================================================================
// Client trait
// ============================================================================

/// Single-shot GET with a bounded timeout.
///
/// Non-2xx statuses are returned as normal responses; only transport
/// failures are errors.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, LinkError>;
}

// ============================================================================
// reqwest transport
// ============================================================================

/// [`HttpClient`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: Client,
    max_body_bytes: usize,
}

impl ReqwestClient {
    /// Creates a client from the extraction config.
    pub fn new(config: &Config) -> Result<Self, ExtractError> {
        let inner = Client::builder()
            .timeout(config.fetch_timeout())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ExtractError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            inner,
            max_body_bytes: config.max_body_bytes,
        })
    }

    fn map_error(e: &reqwest::Error, timeout: Duration) -> LinkError {
        if e.is_timeout() {
            LinkError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
        } else {
            LinkError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, LinkError> {
        let parsed = Url::parse(url).map_err(|e| LinkError::InvalidUrl(format!("{url}: {e}")))?;
        debug!("GET request");

        let mut response = self
            .inner
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!(status, content_type = ?content_type, "Response received");

        if let Some(len) = response.content_length()
            && usize::try_from(len).unwrap_or(usize::MAX) > self.max_body_bytes
        {
            return Err(LinkError::TooLarge(usize::try_from(len).unwrap_or(usize::MAX)));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::map_error(&e, timeout))?
        {
            body.extend_from_slice(&chunk);
            if body.len() > self.max_body_bytes {
                return Err(LinkError::TooLarge(body.len()));
            }
        }

        Ok(HttpResponse {
            url: final_url,
            status,
            content_type,
            body,
        })
    }
}
