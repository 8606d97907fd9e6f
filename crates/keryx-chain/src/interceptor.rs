//! Route-scoped interceptors.
//!
//! An interceptor is a reusable chain step that routes opt into by
//! kind, each binding carrying its own configuration value. Interceptors
//! run after every matching filter, in the order the route declares
//! them.

use std::collections::HashMap;
use std::sync::Arc;

use keryx_core::BoxFuture;
use parking_lot::RwLock;

use crate::context::RequestContext;
use crate::error::ChainResult;

/// A chain step bound to routes by kind.
///
/// The same implementation serves every route that declares its kind;
/// the per-route configuration arrives as `config`. Like a filter, an
/// interceptor continues the chain with [`RequestContext::proceed`] or
/// short-circuits by returning without proceeding.
pub trait Interceptor: Send + Sync {
    /// The kind routes use to bind this interceptor.
    fn kind(&self) -> &str;

    /// Runs this step around the rest of the chain.
    fn around<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        config: &'a serde_json::Value,
    ) -> BoxFuture<'a, ChainResult>;
}

/// Adapter turning a function into an [`Interceptor`].
///
/// As with [`FnFilter`](crate::FnFilter), fn items coerce most cleanly:
///
/// ```ignore
/// fn throttle<'a>(
///     ctx: &'a mut RequestContext,
///     config: &'a serde_json::Value,
/// ) -> BoxFuture<'a, ChainResult> {
///     Box::pin(async move {
///         let limit = config["limit"].as_u64().unwrap_or(100);
///         ctx.bag_mut().insert("limit", limit);
///         ctx.proceed().await
///     })
/// }
///
/// let interceptor = FnInterceptor::new("throttle", throttle);
/// ```
pub struct FnInterceptor<F> {
    kind: String,
    func: F,
}

impl<F> FnInterceptor<F>
where
    F: for<'a> Fn(&'a mut RequestContext, &'a serde_json::Value) -> BoxFuture<'a, ChainResult>
        + Send
        + Sync,
{
    /// Wraps a function as an interceptor of the given kind.
    pub fn new(kind: impl Into<String>, func: F) -> Self {
        Self {
            kind: kind.into(),
            func,
        }
    }
}

impl<F> Interceptor for FnInterceptor<F>
where
    F: for<'a> Fn(&'a mut RequestContext, &'a serde_json::Value) -> BoxFuture<'a, ChainResult>
        + Send
        + Sync,
{
    fn kind(&self) -> &str {
        &self.kind
    }

    fn around<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        config: &'a serde_json::Value,
    ) -> BoxFuture<'a, ChainResult> {
        (self.func)(ctx, config)
    }
}

impl<F> std::fmt::Debug for FnInterceptor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnInterceptor")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Registry of interceptor implementations, keyed by kind.
///
/// Routes reference interceptors by kind string; chain construction
/// looks each binding up here and fails if a kind is unknown.
#[derive(Default)]
pub struct InterceptorRegistry {
    by_kind: RwLock<HashMap<String, Arc<dyn Interceptor>>>,
}

impl InterceptorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an interceptor under its own kind.
    ///
    /// Registering a second interceptor with the same kind replaces the
    /// first; the displaced one is returned.
    pub fn register(&self, interceptor: Arc<dyn Interceptor>) -> Option<Arc<dyn Interceptor>> {
        let kind = interceptor.kind().to_owned();
        self.by_kind.write().insert(kind, interceptor)
    }

    /// Looks up the interceptor registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<Arc<dyn Interceptor>> {
        self.by_kind.read().get(kind).map(Arc::clone)
    }

    /// Returns true if an interceptor is registered for `kind`.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.by_kind.read().contains_key(kind)
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_kind.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_kind.read().is_empty()
    }

    /// The registered kinds, in no particular order.
    #[must_use]
    pub fn kinds(&self) -> Vec<String> {
        self.by_kind.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Kinded(&'static str);

    impl Interceptor for Kinded {
        fn kind(&self) -> &str {
            self.0
        }

        fn around<'a>(
            &'a self,
            ctx: &'a mut RequestContext,
            _config: &'a serde_json::Value,
        ) -> BoxFuture<'a, ChainResult> {
            Box::pin(ctx.proceed())
        }
    }

    #[test]
    fn test_register_and_get_by_kind() {
        let registry = InterceptorRegistry::new();
        assert!(registry.register(Arc::new(Kinded("auth"))).is_none());

        assert!(registry.contains("auth"));
        assert_eq!(registry.get("auth").unwrap().kind(), "auth");
        assert!(registry.get("audit").is_none());
    }

    #[test]
    fn test_reregistering_a_kind_replaces_it() {
        let registry = InterceptorRegistry::new();
        registry.register(Arc::new(Kinded("auth")));
        let displaced = registry.register(Arc::new(Kinded("auth")));

        assert!(displaced.is_some());
        assert_eq!(registry.len(), 1);
    }
}
