//! Error handling for requrl

use thiserror::Error;

/// Main error type for requrl operations
#[derive(Error, Debug)]
pub enum RequrlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Proxy error: {0}")]
    Proxy(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for requrl operations
pub type Result<T> = std::result::Result<T, RequrlError>;
