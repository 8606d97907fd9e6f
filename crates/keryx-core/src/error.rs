//! Action failure type.
//!
//! [`ActionError`] is the single failure type application code returns from
//! actions, filters, and interceptors. The dispatcher catches it once at
//! the top of the chain, logs the full source chain, and converts it to a
//! generic 500 response; the error text itself is never sent to clients.

use thiserror::Error;

/// Result type alias for action invocations.
pub type ActionResult = Result<crate::Response, ActionError>;

/// An unhandled failure raised by application code.
///
/// Carries a human-readable message for the log and an optional source
/// error preserving the underlying cause chain.
///
/// # Example
///
/// ```
/// use keryx_core::ActionError;
///
/// fn load() -> Result<(), ActionError> {
///     Err(ActionError::new("user store unavailable"))
/// }
///
/// assert!(load().unwrap_err().to_string().contains("unavailable"));
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

impl ActionError {
    /// Creates an error with a message and no source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the log message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for ActionError {
    fn from(source: anyhow::Error) -> Self {
        Self {
            message: source.to_string(),
            source: Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_message_only() {
        let err = ActionError::new("boom");
        assert_eq!(err.message(), "boom");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_source_chain_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ActionError::with_source("downstream call failed", io);

        assert_eq!(err.message(), "downstream call failed");
        let source = err.source().expect("source should be preserved");
        assert!(source.to_string().contains("refused"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: ActionError = anyhow::anyhow!("wrapped").into();
        assert_eq!(err.message(), "wrapped");
    }
}
