//! Body validation seam.
//!
//! A [`Validator`] inspects the decoded body before it is handed to the
//! action. Violations are reported as data, never panics, so the binder
//! can turn them into a client-facing 422 response.

use serde::Serialize;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `address.zip`.
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Violation {
    /// Creates a violation for a field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validates a decoded request body.
///
/// An empty result means the body is acceptable.
pub trait Validator: Send + Sync {
    /// Checks `body` and returns every violation found.
    fn validate(&self, body: &serde_json::Value) -> Vec<Violation>;
}
