//! Error types for JSON extraction

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort an extraction request
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Neither a file path nor a URL was supplied
    #[error("Bad input: {0}")]
    BadInput(String),

    /// The local source file does not exist
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    /// Every strategy ran and none produced a JSON value
    #[error("No JSON payload found in email")]
    NoJsonFound,

    /// The remote source could not be retrieved
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The local source could not be read
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The email structure is malformed
    #[error("Failed to parse email structure: {0}")]
    Parse(String),

    /// Invalid configuration file or value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Classified outcome reported to the caller of an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadInput,
    NotFound,
    FetchError,
    ReadError,
    ParseError,
}

impl ExtractError {
    /// Classify this error into the caller-facing taxonomy
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadInput(_) | Self::Config(_) => ErrorKind::BadInput,
            Self::SourceNotFound(_) | Self::NoJsonFound => ErrorKind::NotFound,
            Self::Fetch { .. } => ErrorKind::FetchError,
            Self::Read { .. } => ErrorKind::ReadError,
            Self::Parse(_) => ErrorKind::ParseError,
        }
    }
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Non-fatal failure that only eliminates a single link candidate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Transport-level failure (DNS, connect, TLS, protocol)
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the configured timeout
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// Link could not be parsed or resolved into an absolute URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response arrived with a status other than 200
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Body declared or sniffed as JSON did not parse
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Body exceeded the configured size bound
    #[error("Response body too large ({0} bytes)")]
    TooLarge(usize),
}
