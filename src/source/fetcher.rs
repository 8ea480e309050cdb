//! Content fetcher trait for reading single files out of remote repositories

#[cfg(test)]
use mockall::automock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::source::error::FetchError;

/// A file body as delivered by the remote, not yet decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    /// `base64` for inline API payloads, `utf-8` for raw downloads
    pub encoding: String,
    pub content: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported encoding {encoding:?} for {path}")]
    UnsupportedEncoding { path: String, encoding: String },

    #[error("invalid base64 in {path}: {reason}")]
    Base64 { path: String, reason: String },

    #[error("{path} is not valid UTF-8")]
    Utf8 { path: String },
}

impl FileContent {
    pub fn base64(path: &str, content: &str) -> Self {
        Self {
            path: path.to_string(),
            encoding: "base64".to_string(),
            content: content.to_string(),
        }
    }

    pub fn utf8(path: &str, content: &str) -> Self {
        Self {
            path: path.to_string(),
            encoding: "utf-8".to_string(),
            content: content.to_string(),
        }
    }

    /// Decode the body into text
    ///
    /// The contents API wraps base64 payloads at 60 columns, so whitespace is
    /// stripped before decoding.
    pub fn decode(&self) -> Result<String, DecodeError> {
        match self.encoding.as_str() {
            "utf-8" => Ok(self.content.clone()),
            "base64" => {
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = STANDARD.decode(compact).map_err(|e| DecodeError::Base64 {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })?;
                String::from_utf8(bytes).map_err(|_| DecodeError::Utf8 {
                    path: self.path.clone(),
                })
            }
            other => Err(DecodeError::UnsupportedEncoding {
                path: self.path.clone(),
                encoding: other.to_string(),
            }),
        }
    }
}

/// What a repository path resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteContent {
    /// A regular file
    File(FileContent),
    /// Anything else: `dir`, `symlink`, `submodule`
    Other { path: String, kind: String },
}

/// Trait for fetching a single path out of a repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetches `path` from the repository named `full_name` (`owner/name`)
    ///
    /// # Returns
    /// * `Ok(RemoteContent)` - The file body, or the kind of a non-file entry
    /// * `Err(FetchError)` - If the path does not exist or the request fails
    async fn fetch(&self, full_name: &str, path: &str) -> Result<RemoteContent, FetchError>;
}
