#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use email_json_extract::{HttpClient, HttpResponse, LinkError};

/// In-memory HTTP client that records every URL it is asked for.
///
/// Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeHttp {
    routes: HashMap<String, Result<HttpResponse, LinkError>>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(
        mut self,
        url: &str,
        status: u16,
        content_type: Option<&str>,
        body: &str,
    ) -> Self {
        self.routes.insert(
            url.to_string(),
            Ok(HttpResponse::new(url, status, content_type, body)),
        );
        self
    }

    pub fn json(self, url: &str, body: &str) -> Self {
        self.respond(url, 200, Some("application/json; charset=utf-8"), body)
    }

    pub fn html(self, url: &str, body: &str) -> Self {
        self.respond(url, 200, Some("text/html; charset=utf-8"), body)
    }

    pub fn fail(mut self, url: &str, error: LinkError) -> Self {
        self.routes.insert(url.to_string(), Err(error));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, LinkError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.routes
            .get(url)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::new(url, 404, Some("text/plain"), "not found")))
    }
}

/// Single-part email with the given content type and body
pub fn simple_email(content_type: &str, body: &str) -> Vec<u8> {
    format!(
        "From: sender@example.com\r\n\
         To: recipient@example.com\r\n\
         Subject: Export ready\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: {content_type}\r\n\
         \r\n\
         {body}"
    )
    .into_bytes()
}

pub fn html_email(html: &str) -> Vec<u8> {
    simple_email("text/html; charset=utf-8", html)
}

pub fn text_email(text: &str) -> Vec<u8> {
    simple_email("text/plain; charset=utf-8", text)
}

/// A MIME part for [`multipart_email`]
pub struct Part<'a> {
    pub content_type: &'a str,
    pub filename: Option<&'a str>,
    pub transfer_encoding: Option<&'a str>,
    pub body: &'a str,
}

pub fn body_part<'a>(content_type: &'a str, body: &'a str) -> Part<'a> {
    Part {
        content_type,
        filename: None,
        transfer_encoding: None,
        body,
    }
}

pub fn attachment<'a>(content_type: &'a str, filename: &'a str, body: &'a str) -> Part<'a> {
    Part {
        content_type,
        filename: Some(filename),
        transfer_encoding: None,
        body,
    }
}

/// Attachment declared as base64, with `body` written as given
pub fn base64_attachment<'a>(content_type: &'a str, filename: &'a str, body: &'a str) -> Part<'a> {
    Part {
        transfer_encoding: Some("base64"),
        ..attachment(content_type, filename, body)
    }
}

/// multipart/mixed email with the given parts in order
pub fn multipart_email(parts: &[Part<'_>]) -> Vec<u8> {
    let mut raw = String::from(
        "From: sender@example.com\r\n\
         To: recipient@example.com\r\n\
         Subject: Export ready\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: multipart/mixed; boundary=\"BOUNDARY42\"\r\n\
         \r\n\
         This is a multi-part message in MIME format.\r\n",
    );

    for part in parts {
        raw.push_str("--BOUNDARY42\r\n");
        raw.push_str(&format!("Content-Type: {}\r\n", part.content_type));
        if let Some(filename) = part.filename {
            raw.push_str(&format!(
                "Content-Disposition: attachment; filename=\"{filename}\"\r\n"
            ));
        }
        if let Some(encoding) = part.transfer_encoding {
            raw.push_str(&format!("Content-Transfer-Encoding: {encoding}\r\n"));
        }
        raw.push_str("\r\n");
        raw.push_str(part.body);
        raw.push_str("\r\n");
    }
    raw.push_str("--BOUNDARY42--\r\n");

    raw.into_bytes()
}
