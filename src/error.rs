//! Error types for the URL hash binding.

use thiserror::Error;

/// Main error type for binding operations.
///
/// Errors are `Clone` so the most recent inbound failure can be held in the
/// binding's observable error cell.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UrlSyncError {
    #[error("Malformed URL fragment: {0}")]
    MalformedFragment(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Expected JSON object: {0}")]
    Shape(String),

    #[error("Error loading remote state: {0}")]
    RemoteLoad(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Discriminant of [`UrlSyncError`], for matching without the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedFragment,
    Decode,
    Shape,
    RemoteLoad,
    InvalidState,
    InvalidUrl,
    InvalidConfig,
}

impl UrlSyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UrlSyncError::MalformedFragment(_) => ErrorKind::MalformedFragment,
            UrlSyncError::Decode(_) => ErrorKind::Decode,
            UrlSyncError::Shape(_) => ErrorKind::Shape,
            UrlSyncError::RemoteLoad(_) => ErrorKind::RemoteLoad,
            UrlSyncError::InvalidState(_) => ErrorKind::InvalidState,
            UrlSyncError::InvalidUrl(_) => ErrorKind::InvalidUrl,
            UrlSyncError::InvalidConfig(_) => ErrorKind::InvalidConfig,
        }
    }
}

impl From<serde_json::Error> for UrlSyncError {
    fn from(e: serde_json::Error) -> Self {
        UrlSyncError::Decode(e.to_string())
    }
}

impl From<url::ParseError> for UrlSyncError {
    fn from(e: url::ParseError) -> Self {
        UrlSyncError::InvalidUrl(e.to_string())
    }
}

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, UrlSyncError>;
