//! Core types for decoded emails and extraction results

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Structured view over a raw email, as far as JSON extraction cares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Attachments in document order
    pub attachments: Vec<Attachment>,

    /// First HTML body part, if any
    pub html: Option<String>,

    /// First plain-text body part, if any
    pub text: Option<String>,
}

impl DecodedMessage {
    /// Check if the message carries neither attachments nor bodies
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.attachments.is_empty() && self.html.is_none() && self.text.is_none()
    }
}

/// A typed binary part of an email distinct from its body
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Declared MIME type, lowercased (e.g., "application/json")
    pub content_type: String,

    /// Filename from Content-Disposition or the Content-Type name parameter
    pub filename: Option<String>,

    /// Decoded content (transfer encoding already removed)
    pub content: Vec<u8>,

    /// Why the transfer encoding could not be undone, if it could not
    pub decode_error: Option<String>,
}

impl Attachment {
    #[must_use]
    pub fn new(
        content_type: impl Into<String>,
        filename: Option<&str>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            filename: filename.map(str::to_string),
            content: content.into(),
            decode_error: None,
        }
    }

    /// An attachment whose body could not be decoded
    #[must_use]
    pub fn undecodable(
        content_type: impl Into<String>,
        filename: Option<&str>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            filename: filename.map(str::to_string),
            content: Vec::new(),
            decode_error: Some(error.into()),
        }
    }

    /// Filename for log output
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("(unnamed)")
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .field("content_len", &self.content.len())
            .field("decode_error", &self.decode_error)
            .finish()
    }
}

/// Where the extracted JSON came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ExtractionSource {
    /// JSON carried as a direct attachment
    Attachment { filename: Option<String> },

    /// A body link pointing straight at a JSON resource
    DirectLink { url: String },

    /// A body link to a page that itself links to a JSON resource
    ChasedLink { page: String, url: String },
}

impl ExtractionSource {
    /// Short strategy name for logs
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Attachment { .. } => "attachment",
            Self::DirectLink { .. } => "direct_link",
            Self::ChasedLink { .. } => "chased_link",
        }
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attachment { filename } => {
                write!(f, "attachment {}", filename.as_deref().unwrap_or("(unnamed)"))
            }
            Self::DirectLink { url } => write!(f, "link {url}"),
            Self::ChasedLink { page, url } => write!(f, "link {url} (via {page})"),
        }
    }
}

/// The single JSON value found for a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// The parsed JSON document
    pub value: Value,

    /// Strategy and location that produced it
    pub source: ExtractionSource,
}

impl Extraction {
    #[must_use]
    pub const fn new(value: Value, source: ExtractionSource) -> Self {
        Self { value, source }
    }

    /// Consume and return only the JSON value
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}
