//! Structured error types for upload attempts

use std::fmt;

/// Errors an upload attempt can end with
#[derive(Debug, Clone, PartialEq)]
pub enum UploadError {
    /// The local resource could not be found or is not a regular file.
    /// Reported synchronously when the upload is started, never through a callback.
    ResourceMissing(String),
    /// The transfer failed; the reason is supplied by the request client
    UploadFailed(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::ResourceMissing(path) => write!(f, "resource not found: {}", path),
            UploadError::UploadFailed(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for UploadError {}

impl UploadError {
    /// Wrap any failure description as an `UploadFailed`
    pub fn failed(reason: impl Into<String>) -> Self {
        UploadError::UploadFailed(reason.into())
    }

    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Result type for starting an upload
pub type UploadResult<T = ()> = Result<T, UploadError>;
