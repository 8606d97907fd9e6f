//! Test error types.

use thiserror::Error;

/// Errors that can occur while building requests or reading responses.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be assembled.
    #[error("request build error: {0}")]
    RequestBuild(String),

    /// A header name or value was not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A response body was not valid UTF-8.
    #[error("body is not UTF-8: {0}")]
    BodyEncoding(#[from] std::string::FromUtf8Error),
}
