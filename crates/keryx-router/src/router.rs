//! The live route table and request resolution.

use std::sync::Arc;

use http::Method;
use keryx_core::Request;
use parking_lot::RwLock;
use thiserror::Error;

use crate::media::{accept_intersects, content_type_accepted};
use crate::params::PathParams;
use crate::route::{ActionRef, Route};

/// Outcome of resolving a request against the route table.
///
/// Ordinary "no route" conditions are values, not errors; the dispatch
/// entry point maps them onto 404, 405, and 406 responses.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A route matched; captured placeholders are included.
    Matched {
        /// The winning route.
        route: Arc<Route>,
        /// Placeholder values captured from the path.
        params: PathParams,
    },
    /// No route's template matches the path.
    NotFound,
    /// The path is known but not under this verb.
    MethodNotAllowed {
        /// Verbs that do serve this path, in registration order.
        allowed: Vec<Method>,
    },
    /// Verb and path match, but content negotiation failed.
    NotAcceptable,
}

/// Error raised by [`Router::reverse`].
#[derive(Debug, Error)]
pub enum ReverseError {
    /// No route is registered for the action.
    #[error("no route registered for action '{action}'")]
    UnknownAction {
        /// The unresolvable reference.
        action: ActionRef,
    },

    /// The template needs a placeholder value that was not supplied.
    #[error("no value supplied for placeholder '{name}' in '{template}'")]
    MissingPlaceholder {
        /// The placeholder without a value.
        name: String,
        /// The template being expanded.
        template: String,
    },
}

/// Thread-safe collection of registered routes.
///
/// The table is an immutable snapshot behind a reader-writer lock.
/// Resolution clones the snapshot handle and works lock-free from there;
/// registration and deregistration swap in a rebuilt snapshot, so a
/// concurrent reader sees either the old table or the new one, never a
/// partial update.
#[derive(Debug, Default)]
pub struct Router {
    routes: RwLock<Arc<Vec<Arc<Route>>>>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route to the table.
    ///
    /// Duplicate templates are allowed on purpose: routes sharing a
    /// template but differing in accepts/produces are how
    /// content-negotiated overloads are expressed. Registration order is
    /// preserved and participates in tie-breaking.
    pub fn register(&self, route: Route) {
        let mut table = self.routes.write();
        let mut next = Vec::clone(table.as_ref());
        next.push(Arc::new(route));
        *table = Arc::new(next);
    }

    /// Removes every route whose action matches. Returns how many were
    /// removed.
    pub fn unregister(&self, action: &ActionRef) -> usize {
        let mut table = self.routes.write();
        let before = table.len();
        let next: Vec<Arc<Route>> = table
            .iter()
            .filter(|route| route.action() != action)
            .cloned()
            .collect();
        let removed = before - next.len();
        *table = Arc::new(next);
        removed
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }

    /// A snapshot of the registered routes, in registration order.
    #[must_use]
    pub fn routes(&self) -> Vec<Arc<Route>> {
        self.routes.read().iter().cloned().collect()
    }

    /// Resolves a request against the table.
    #[must_use]
    pub fn resolve(&self, request: &Request) -> Resolution {
        self.resolve_parts(
            request.method(),
            request.path(),
            request.content_type(),
            request.accept(),
        )
    }

    /// Resolves from the request's constituent parts.
    ///
    /// The path is narrowed first, independent of verb, so a known path
    /// under the wrong verb reports 405 rather than 404. Among
    /// verb-matching candidates, content negotiation filters by the
    /// request's `Content-Type` and `Accept`; if that eliminates
    /// everything, the outcome is [`Resolution::NotAcceptable`]. The
    /// most specific template wins (fewest placeholders), and remaining
    /// ties go to the first registered route.
    #[must_use]
    pub fn resolve_parts(
        &self,
        method: &Method,
        path: &str,
        content_type: Option<&str>,
        accept: Option<&str>,
    ) -> Resolution {
        let table = Arc::clone(&self.routes.read());

        let path_matches: Vec<(&Arc<Route>, PathParams)> = table
            .iter()
            .filter_map(|route| route.matches_path(path).map(|params| (route, params)))
            .collect();
        if path_matches.is_empty() {
            return Resolution::NotFound;
        }

        let verb_matches: Vec<&(&Arc<Route>, PathParams)> = path_matches
            .iter()
            .filter(|(route, _)| route.method() == method)
            .collect();
        if verb_matches.is_empty() {
            let mut allowed: Vec<Method> = Vec::new();
            for (route, _) in &path_matches {
                if !allowed.contains(route.method()) {
                    allowed.push(route.method().clone());
                }
            }
            return Resolution::MethodNotAllowed { allowed };
        }

        let negotiated = verb_matches.into_iter().filter(|(route, _)| {
            content_type_accepted(route.accepts(), content_type)
                && accept_intersects(route.produces(), accept)
        });

        negotiated
            .min_by_key(|(route, _)| route.template().placeholder_count())
            .map_or(Resolution::NotAcceptable, |(route, params)| {
                Resolution::Matched {
                    route: Arc::clone(route),
                    params: params.clone(),
                }
            })
    }

    /// Rebuilds a concrete URL for an action.
    ///
    /// Uses the first registered route for the action. Placeholder
    /// values are percent-encoded on substitution except for a greedy
    /// placeholder, whose value is taken verbatim so embedded slashes
    /// survive. Supplied values not consumed by the template are
    /// appended as a query string.
    ///
    /// # Errors
    ///
    /// Fails if no route is registered for the action or a placeholder
    /// has no supplied value.
    pub fn reverse(
        &self,
        action: &ActionRef,
        values: &[(&str, &str)],
    ) -> Result<String, ReverseError> {
        let table = Arc::clone(&self.routes.read());
        let route = table
            .iter()
            .find(|route| route.action() == action)
            .ok_or_else(|| ReverseError::UnknownAction {
                action: action.clone(),
            })?;

        let template = route.template();
        let path = template
            .expand(|name| {
                values
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, v)| *v)
            })
            .map_err(|name| ReverseError::MissingPlaceholder {
                name,
                template: template.as_str().to_string(),
            })?;

        let query: Vec<String> = values
            .iter()
            .filter(|(name, _)| !template.has_placeholder(name))
            .map(|(name, value)| {
                format!("{}={}", urlencoding::encode(name), urlencoding::encode(value))
            })
            .collect();

        if query.is_empty() {
            Ok(path)
        } else {
            Ok(format!("{}?{}", path, query.join("&")))
        }
    }
}
