// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

//! Email JSON Extractor
//!
//! Locates the JSON payload associated with a raw email. Three strategies
//! are tried in order and the first hit wins:
//!
//! 1. A JSON attachment (by content-type, or by a `.json` filename)
//! 2. A body link that serves JSON directly
//! 3. A body link to an HTML page that links to a `.json` resource
//!
//! # Example
//!
//! ```rust
//! use email_json_extract::{decode_message, scan_attachments, AttachmentParseFailure};
//!
//! let raw = b"From: sender@example.com\r\n\
//!             Content-Type: application/json; name=\"data.json\"\r\n\
//!             \r\n\
//!             {\"a\":1}";
//! let message = decode_message(raw).unwrap();
//! let found = scan_attachments(&message.attachments, AttachmentParseFailure::Stop).unwrap();
//!
//! assert_eq!(found.value, serde_json::json!({"a": 1}));
//! ```

mod attachments;
mod chaser;
mod config;
mod error;
mod extractor;
mod http;
mod links;
mod parser;
mod resolver;
mod source;
mod types;

pub use attachments::{is_json_attachment, parse_json_content, scan_attachments};
pub use chaser::{has_json_path, json_candidates, resolve_candidate, PageLinkChaser};
pub use config::{AttachmentParseFailure, Config, DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_USER_AGENT};
pub use error::{ErrorKind, ExtractError, LinkError, Result};
pub use extractor::JsonExtractor;
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use links::{harvest_links, harvest_page_hrefs, harvest_text_urls, is_excluded_link};
pub use parser::decode_message;
pub use resolver::{classify_response, LinkResolver, ResponseClass};
pub use source::{fetch_source, SourceDescriptor};
pub use types::*;
