//! Source descriptors and raw content retrieval

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::error::{ExtractError, Result};
use crate::http::HttpClient;

/// Where the raw email comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    FilePath(PathBuf),
    RemoteUrl(String),
}

impl SourceDescriptor {
    /// Build a descriptor from optional request parameters.
    ///
    /// A non-empty path takes precedence over a URL.
    pub fn from_params(path: Option<&str>, url: Option<&str>) -> Result<Self> {
        let path = path.map(str::trim).filter(|p| !p.is_empty());
        let url = url.map(str::trim).filter(|u| !u.is_empty());

        match (path, url) {
            (Some(path), _) => Ok(Self::FilePath(PathBuf::from(path))),
            (None, Some(url)) => Ok(Self::RemoteUrl(url.to_string())),
            (None, None) => Err(ExtractError::BadInput(
                "either a file path or a URL is required".to_string(),
            )),
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilePath(path) => write!(f, "{}", path.display()),
            Self::RemoteUrl(url) => write!(f, "{url}"),
        }
    }
}

/// Retrieve the raw bytes behind a source descriptor
#[instrument(skip(descriptor, client), fields(source = %descriptor))]
pub async fn fetch_source(
    descriptor: &SourceDescriptor,
    client: &dyn HttpClient,
    timeout: Duration,
) -> Result<Vec<u8>> {
    match descriptor {
        SourceDescriptor::FilePath(path) => {
            let data = tokio::fs::read(path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractError::SourceNotFound(path.clone())
                } else {
                    ExtractError::Read {
                        path: path.clone(),
                        source: e,
                    }
                }
            })?;
            debug!(bytes = data.len(), "Read source file");
            Ok(data)
        }
        SourceDescriptor::RemoteUrl(url) => {
            let response = client
                .get(url, timeout)
                .await
                .map_err(|e| ExtractError::Fetch {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
            if !response.is_ok() {
                return Err(ExtractError::Fetch {
                    url: url.clone(),
                    reason: format!("HTTP status {}", response.status),
                });
            }
            debug!(bytes = response.body.len(), "Fetched source URL");
            Ok(response.body)
        }
    }
}
