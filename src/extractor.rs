//! Extraction pipeline.
//!
//! Runs the strategies in fixed order and stops at the first success:
//! attachments, then body links (each possibly chased one hop through an
//! HTML page). All state is local to one call.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::attachments::scan_attachments;
use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::http::{HttpClient, ReqwestClient};
use crate::links::harvest_links;
use crate::parser::decode_message;
use crate::resolver::LinkResolver;
use crate::source::{fetch_source, SourceDescriptor};
use crate::types::{DecodedMessage, Extraction};

/// Finds the JSON payload associated with an email
#[derive(Clone)]
pub struct JsonExtractor {
    config: Config,
    client: Arc<dyn HttpClient>,
}

impl JsonExtractor {
    /// Creates an extractor with a reqwest transport built from `config`
    pub fn new(config: Config) -> Result<Self> {
        let client = ReqwestClient::new(&config)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Creates an extractor over a caller-supplied HTTP client
    #[must_use]
    pub fn with_client(config: Config, client: Arc<dyn HttpClient>) -> Self {
        Self { config, client }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch, decode, and search the email behind `descriptor`
    #[instrument(skip(self, descriptor), fields(source = %descriptor))]
    pub async fn extract(&self, descriptor: &SourceDescriptor) -> Result<Extraction> {
        let timeout = self.config.fetch_timeout();
        let raw = fetch_source(descriptor, self.client.as_ref(), timeout).await?;
        self.extract_from_bytes(&raw).await
    }

    /// Decode raw email bytes and search them
    pub async fn extract_from_bytes(&self, raw: &[u8]) -> Result<Extraction> {
        let message = decode_message(raw)?;
        self.extract_from_message(&message).await
    }

    /// Search an already-decoded message
    pub async fn extract_from_message(&self, message: &DecodedMessage) -> Result<Extraction> {
        debug!(
            attachments = message.attachments.len(),
            "Scanning attachments"
        );
        if let Some(found) =
            scan_attachments(&message.attachments, self.config.attachment_parse_failure)
        {
            info!(source = %found.source, "JSON found");
            return Ok(found);
        }

        let links = harvest_links(message.html.as_deref(), message.text.as_deref());
        if links.is_empty() {
            debug!("No candidate links in email body");
            return Err(ExtractError::NoJsonFound);
        }

        debug!(count = links.len(), "Resolving body links");
        let resolver = LinkResolver::new(self.client.as_ref(), self.config.fetch_timeout());
        match resolver.resolve_first(&links).await {
            Some(found) => {
                info!(source = %found.source, "JSON found");
                Ok(found)
            }
            None => {
                info!(links = links.len(), "No JSON found after all strategies");
                Err(ExtractError::NoJsonFound)
            }
        }
    }
}
