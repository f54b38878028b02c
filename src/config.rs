//! Extraction configuration.
//!
//! Loaded from a TOML file when one is given, otherwise built-in defaults.
//! Every field is optional in the file:
//!
//! ```toml
//! fetch_timeout_ms = 5000
//! max_redirects = 5
//! attachment_parse_failure = "stop"   # or "next_attachment"
//! max_body_bytes = 10485760
//! log_level = "warn"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Default timeout for every outbound fetch.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// User agent sent with every outbound fetch.
pub const DEFAULT_USER_AGENT: &str = concat!("email-json-extract/", env!("CARGO_PKG_VERSION"));

/// What the attachment scanner does when a JSON-typed attachment fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentParseFailure {
    /// Give up on attachments and move on to the link strategies.
    #[default]
    Stop,
    /// Keep scanning for the next JSON-typed attachment.
    NextAttachment,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timeout in milliseconds for the source fetch and each link fetch.
    pub fetch_timeout_ms: u64,
    /// Redirects followed by the transport before giving up on a link.
    pub max_redirects: usize,
    /// User-Agent header value.
    pub user_agent: String,
    /// Behavior on a classified-but-unparsable JSON attachment.
    pub attachment_parse_failure: AttachmentParseFailure,
    /// Responses larger than this are treated as non-matches.
    pub max_body_bytes: usize,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            attachment_parse_failure: AttachmentParseFailure::Stop,
            max_body_bytes: 10 * 1024 * 1024,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or defaults when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::Config(format!("cannot read '{}': {e}", path.display()))
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ExtractError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch_timeout_ms == 0 {
            return Err(ExtractError::Config(
                "fetch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-fetch timeout as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
