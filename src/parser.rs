//! Email decoder: raw bytes to attachments and bodies

use crate::error::{ExtractError, Result};
use crate::types::{Attachment, DecodedMessage};
use mailparse::{DispositionType, ParsedMail};
use tracing::{debug, warn};

/// Decode raw email bytes into a [`DecodedMessage`]
pub fn decode_message(raw: &[u8]) -> Result<DecodedMessage> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let mut message = DecodedMessage::default();
    walk_part(&parsed, &mut message);

    debug!(
        attachments = message.attachments.len(),
        has_html = message.html.is_some(),
        has_text = message.text.is_some(),
        "Decoded email"
    );

    Ok(message)
}

fn walk_part(part: &ParsedMail, message: &mut DecodedMessage) {
    if !part.subparts.is_empty() {
        for sub in &part.subparts {
            walk_part(sub, message);
        }
        return;
    }

    let content_type = part.ctype.mimetype.to_lowercase();
    let filename = part_filename(part);

    if is_attachment_part(part, &content_type, filename.as_deref()) {
        // A broken transfer encoding spoils this part only, not the message
        let attachment = match part.get_body_raw() {
            Ok(content) => {
                debug!(content_type = %content_type, filename = ?filename, "Found attachment");
                Attachment {
                    content_type,
                    filename,
                    content,
                    decode_error: None,
                }
            }
            Err(e) => {
                warn!(
                    content_type = %content_type,
                    filename = ?filename,
                    error = %e,
                    "Attachment body could not be decoded"
                );
                Attachment::undecodable(content_type, filename.as_deref(), e.to_string())
            }
        };
        message.attachments.push(attachment);
        return;
    }

    // Undecodable body text is dropped rather than failing the whole message
    let Ok(body) = part.get_body() else {
        debug!(content_type = %content_type, "Skipping undecodable body part");
        return;
    };

    if content_type == "text/html" {
        if message.html.is_none() {
            message.html = Some(body);
        }
    } else if message.text.is_none() {
        message.text = Some(body);
    }
}

fn is_attachment_part(part: &ParsedMail, content_type: &str, filename: Option<&str>) -> bool {
    if matches!(
        part.get_content_disposition().disposition,
        DispositionType::Attachment
    ) {
        return true;
    }
    if filename.is_some() {
        return true;
    }
    !matches!(content_type, "text/plain" | "text/html")
}

/// Filename from `Content-Disposition: ...; filename=` or `Content-Type: ...; name=`
fn part_filename(part: &ParsedMail) -> Option<String> {
    part.get_content_disposition()
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
