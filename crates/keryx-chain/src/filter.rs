//! URL-scoped filters.
//!
//! A filter is a cross-cutting chain step registered against a URL
//! pattern, independent of any specific action. Filters run before the
//! matched route's interceptors, outermost first by descending priority.

use std::sync::Arc;

use keryx_core::BoxFuture;
use keryx_router::{RegistrationError, UrlTemplate};
use parking_lot::RwLock;

use crate::context::RequestContext;
use crate::error::ChainResult;

/// A chain step scoped by URL pattern.
///
/// Implementations receive the request context, may read and mutate the
/// shared data bag, and decide whether to continue the chain by calling
/// [`RequestContext::proceed`]. Not proceeding short-circuits: downstream
/// filters, interceptors, and the action never run, and the filter's own
/// return value becomes the response. A filter may also post-process the
/// result `proceed()` hands back.
///
/// # Example
///
/// ```ignore
/// struct RequireSession;
///
/// impl Filter for RequireSession {
///     fn name(&self) -> &str {
///         "require-session"
///     }
///
///     fn apply<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, ChainResult> {
///         Box::pin(async move {
///             if ctx.request().cookie("session").is_none() {
///                 let denied = Response::text(http::StatusCode::UNAUTHORIZED, "sign in first");
///                 return Ok(denied);
///             }
///             ctx.proceed().await
///         })
///     }
/// }
/// ```
pub trait Filter: Send + Sync {
    /// A stable name used in logs and error messages.
    fn name(&self) -> &str;

    /// Runs this step around the rest of the chain.
    fn apply<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, ChainResult>;
}

/// Adapter turning a function into a [`Filter`].
///
/// Works best with fn items, which coerce cleanly to the higher-ranked
/// signature:
///
/// ```ignore
/// fn stamp<'a>(ctx: &'a mut RequestContext) -> BoxFuture<'a, ChainResult> {
///     Box::pin(async move {
///         ctx.bag_mut().insert("stamped", true);
///         ctx.proceed().await
///     })
/// }
///
/// let filter = FnFilter::new("stamp", stamp);
/// ```
pub struct FnFilter<F> {
    name: String,
    func: F,
}

impl<F> FnFilter<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, ChainResult> + Send + Sync,
{
    /// Wraps a function as a named filter.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Filter for FnFilter<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, ChainResult> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, ChainResult> {
        (self.func)(ctx)
    }
}

impl<F> std::fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFilter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

struct FilterRegistration {
    template: UrlTemplate,
    priority: i32,
    filter: Arc<dyn Filter>,
}

/// The registered filters, ordered for execution.
///
/// Registrations are kept sorted by descending priority; filters sharing
/// a priority stay in registration order. [`FilterSet::matching`] returns
/// the execution-ordered subset whose pattern matches a path.
#[derive(Default)]
pub struct FilterSet {
    registrations: RwLock<Vec<FilterRegistration>>,
}

impl FilterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a filter under a URL pattern.
    ///
    /// The pattern uses route template syntax, so `/admin/{rest*}`
    /// scopes a filter to everything under `/admin/`. Higher priority
    /// runs first (outermost).
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] if the pattern does not parse.
    pub fn register(
        &self,
        pattern: &str,
        priority: i32,
        filter: Arc<dyn Filter>,
    ) -> Result<(), RegistrationError> {
        let template = UrlTemplate::parse(pattern)?;
        let mut registrations = self.registrations.write();
        registrations.push(FilterRegistration {
            template,
            priority,
            filter,
        });
        registrations.sort_by_key(|r| std::cmp::Reverse(r.priority));
        Ok(())
    }

    /// Returns the filters whose pattern matches `path`, outermost
    /// first.
    #[must_use]
    pub fn matching(&self, path: &str) -> Vec<Arc<dyn Filter>> {
        self.registrations
            .read()
            .iter()
            .filter(|r| r.template.capture(path).is_some())
            .map(|r| Arc::clone(&r.filter))
            .collect()
    }

    /// Number of registered filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    /// Returns true if no filters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }
}

impl std::fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .registrations
            .read()
            .iter()
            .map(|r| format!("{} ({})", r.filter.name(), r.priority))
            .collect();
        f.debug_struct("FilterSet").field("filters", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Filter for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn apply<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, ChainResult> {
            Box::pin(ctx.proceed())
        }
    }

    #[test]
    fn test_matching_is_sorted_by_descending_priority() {
        let set = FilterSet::new();
        set.register("/api/{rest*}", 5, Arc::new(Named("low"))).unwrap();
        set.register("/api/{rest*}", 10, Arc::new(Named("high"))).unwrap();

        let filters = set.matching("/api/x");
        let names: Vec<&str> = filters.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["high", "low"]);
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let set = FilterSet::new();
        set.register("/x", 1, Arc::new(Named("first"))).unwrap();
        set.register("/x", 1, Arc::new(Named("second"))).unwrap();

        let filters = set.matching("/x");
        assert_eq!(filters[0].name(), "first");
        assert_eq!(filters[1].name(), "second");
    }

    #[test]
    fn test_pattern_scopes_the_filter() {
        let set = FilterSet::new();
        set.register("/admin/{rest*}", 0, Arc::new(Named("admin")))
            .unwrap();

        assert_eq!(set.matching("/admin/users").len(), 1);
        assert!(set.matching("/public").is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let set = FilterSet::new();
        let err = set.register("/bad/{", 0, Arc::new(Named("x"))).unwrap_err();
        assert!(matches!(err, RegistrationError::Template(_)));
        assert!(set.is_empty());
    }
}
