//! Attachment scanner: the first strategy

use crate::config::AttachmentParseFailure;
use crate::types::{Attachment, Extraction, ExtractionSource};
use serde_json::Value;
use tracing::{debug, warn};

const JSON_MIME: &str = "application/json";

/// Check if an attachment should be treated as a JSON candidate.
///
/// Content-type is checked first; a `.json` filename alone is also enough.
#[must_use]
pub fn is_json_attachment(attachment: &Attachment) -> bool {
    if attachment.content_type.to_lowercase().contains(JSON_MIME) {
        return true;
    }
    attachment
        .filename
        .as_deref()
        .is_some_and(|name| name.to_lowercase().ends_with(".json"))
}

/// Parse attachment content as a JSON document
pub fn parse_json_content(content: &[u8]) -> Result<Value, serde_json::Error> {
    let text = String::from_utf8_lossy(content);
    serde_json::from_str(text.trim_start_matches('\u{feff}'))
}

/// Scan attachments in document order for the first JSON payload.
///
/// With [`AttachmentParseFailure::Stop`] the first JSON-typed attachment is
/// final: if it does not parse, the scan reports no match even when a later
/// attachment would.
#[must_use]
pub fn scan_attachments(
    attachments: &[Attachment],
    on_failure: AttachmentParseFailure,
) -> Option<Extraction> {
    for attachment in attachments.iter().filter(|a| is_json_attachment(a)) {
        debug!(
            filename = attachment.display_name(),
            content_type = %attachment.content_type,
            "JSON attachment candidate"
        );

        let parsed = match &attachment.decode_error {
            Some(reason) => Err(reason.clone()),
            None => parse_json_content(&attachment.content).map_err(|e| e.to_string()),
        };

        match parsed {
            Ok(value) => {
                return Some(Extraction::new(
                    value,
                    ExtractionSource::Attachment {
                        filename: attachment.filename.clone(),
                    },
                ));
            }
            Err(e) => {
                warn!(
                    filename = attachment.display_name(),
                    error = %e,
                    "JSON attachment failed to parse"
                );
                if on_failure == AttachmentParseFailure::Stop {
                    return None;
                }
            }
        }
    }

    None
}
