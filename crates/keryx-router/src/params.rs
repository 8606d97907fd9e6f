//! Captured path parameter storage.
//!
//! Placeholder captures from a template match are stored with a
//! small-vector optimization so the common case (1-4 placeholders per
//! route) needs no heap allocation.

use smallvec::SmallVec;

/// Maximum number of captures stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Placeholder values captured by a successful template match.
///
/// Captures are stored as (name, value) pairs in template order, so the
/// binder can resolve them by name while introspection sees them in the
/// order they appear in the pattern.
///
/// # Example
///
/// ```rust
/// use keryx_router::PathParams;
///
/// let mut params = PathParams::new();
/// params.push("customer", "c-42");
/// params.push("order", "2024-0017");
///
/// assert_eq!(params.get("customer"), Some("c-42"));
/// assert_eq!(params.get("order"), Some("2024-0017"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParams {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl PathParams {
    /// Creates a new empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a captured value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value captured for a placeholder by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if a placeholder was captured under this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns true if no placeholders were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of captured placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over captures in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
