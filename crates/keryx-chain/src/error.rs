//! Chain execution errors.

use keryx_core::{ActionError, Response};
use thiserror::Error;

/// Result type produced by every chain step.
pub type ChainResult = Result<Response, ChainError>;

/// Error raised while driving the interception chain.
///
/// All variants abort the chain; the dispatch entry point logs them and
/// answers the client with a generic 500, so none of this text reaches
/// the wire.
#[derive(Debug, Error)]
pub enum ChainError {
    /// A step called `proceed()` a second time while its downstream had
    /// already run. Chains are not retryable.
    #[error("{step} called proceed() more than once")]
    ProceededTwice {
        /// Description of the offending step.
        step: String,
    },

    /// The chain was driven again after completing.
    #[error("chain has already completed")]
    Completed,

    /// A route declared an interceptor kind nobody registered.
    #[error("no interceptor registered for kind '{kind}'")]
    UnknownInterceptor {
        /// The unresolvable kind.
        kind: String,
    },

    /// Internal bookkeeping went wrong.
    #[error("chain state corrupted: {message}")]
    Corrupted {
        /// What was found to be inconsistent.
        message: String,
    },

    /// Application code failed.
    #[error(transparent)]
    Action(#[from] ActionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_step() {
        let err = ChainError::ProceededTwice {
            step: "filter 'auth'".to_string(),
        };
        assert!(err.to_string().contains("filter 'auth'"));
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_action_error_converts() {
        let err: ChainError = ActionError::new("boom").into();
        assert!(matches!(err, ChainError::Action(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
