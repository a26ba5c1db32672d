//! Error types for meme_maker

use std::fmt;

/// Unified error type for API, rendering, and I/O operations
#[derive(Debug)]
pub enum MemeError {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// HTTP error status code from the remote API
    HttpStatus(reqwest::StatusCode),
    /// API payload reported a logical failure
    Api(String),
    /// Failed to parse JSON response
    Parse(serde_json::Error),
    /// Local image decode or draw failure
    ImageLoad(String),
    /// File I/O error
    Io(std::io::Error),
}

impl fmt::Display for MemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemeError::Network(e) => write!(f, "Network error: {}", e),
            MemeError::HttpStatus(status) => write!(f, "Connection error: HTTP {}", status),
            MemeError::Api(msg) => write!(f, "API error: {}", msg),
            MemeError::Parse(e) => write!(f, "Parse error: {}", e),
            MemeError::ImageLoad(msg) => write!(f, "Image error: {}", msg),
            MemeError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for MemeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MemeError::Network(e) => Some(e),
            MemeError::Parse(e) => Some(e),
            MemeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MemeError {
    fn from(err: reqwest::Error) -> Self {
        MemeError::Network(err)
    }
}

impl From<serde_json::Error> for MemeError {
    fn from(err: serde_json::Error) -> Self {
        MemeError::Parse(err)
    }
}

impl From<std::io::Error> for MemeError {
    fn from(err: std::io::Error) -> Self {
        MemeError::Io(err)
    }
}

/// Result type alias for meme_maker operations
pub type Result<T> = std::result::Result<T, MemeError>;
