//! Error types for the Courier HTTP client.

use thiserror::Error;

/// Errors produced while constructing or executing a request.
///
/// Construction-time errors (`InvalidUrl`) are returned synchronously and no
/// request is created. Everything else is transport-side and is delivered
/// only through the completion callback of a resumed request.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The supplied URL is not a well-formed absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport gave up waiting for the server.
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// The request was cancelled before it completed.
    #[error("request was cancelled")]
    Cancelled,

    /// Invalid header name or value.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Opaque transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
