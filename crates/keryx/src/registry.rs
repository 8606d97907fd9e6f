//! Action lookup by reference.

use std::collections::HashMap;
use std::sync::Arc;

use keryx_core::{Action, ActionResult, BoxFuture, FnAction, Invocation};
use keryx_router::ActionRef;
use parking_lot::RwLock;

/// Maps the opaque [`ActionRef`] a route carries to runnable code.
///
/// Routes stay pure data: they name their action, and the dispatcher
/// looks the implementation up here at dispatch time. A matched route
/// whose reference has no registration is an internal error, not a
/// client-visible 404.
#[derive(Default)]
pub struct ActionRegistry {
    actions: RwLock<HashMap<ActionRef, Arc<dyn Action>>>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action under a reference.
    ///
    /// Re-registering a reference replaces the previous action, which
    /// is returned.
    pub fn register(
        &self,
        action_ref: ActionRef,
        action: Arc<dyn Action>,
    ) -> Option<Arc<dyn Action>> {
        self.actions.write().insert(action_ref, action)
    }

    /// Registers a function as the action for a reference.
    pub fn register_fn<F>(&self, action_ref: ActionRef, func: F)
    where
        F: Fn(Invocation<'_>) -> BoxFuture<'static, ActionResult> + Send + Sync + 'static,
    {
        self.register(action_ref, Arc::new(FnAction::new(func)));
    }

    /// Removes the action registered under a reference.
    pub fn unregister(&self, action_ref: &ActionRef) -> Option<Arc<dyn Action>> {
        self.actions.write().remove(action_ref)
    }

    /// Looks up the action for a reference.
    #[must_use]
    pub fn get(&self, action_ref: &ActionRef) -> Option<Arc<dyn Action>> {
        self.actions.read().get(action_ref).map(Arc::clone)
    }

    /// Returns true if the reference has a registered action.
    #[must_use]
    pub fn contains(&self, action_ref: &ActionRef) -> bool {
        self.actions.read().contains_key(action_ref)
    }

    /// Number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.read().len()
    }

    /// Returns true if no actions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.read().is_empty()
    }

    /// The registered references, in no particular order.
    #[must_use]
    pub fn refs(&self) -> Vec<ActionRef> {
        self.actions.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.refs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use keryx_core::Response;

    fn noop() -> Arc<dyn Action> {
        Arc::new(FnAction::new(|_inv| {
            Box::pin(async { Ok(Response::new(StatusCode::NO_CONTENT)) })
        }))
    }

    #[test]
    fn test_register_and_get() {
        let registry = ActionRegistry::new();
        let show = ActionRef::new("orders", "show");
        registry.register(show.clone(), noop());

        assert!(registry.contains(&show));
        assert!(registry.get(&show).is_some());
        assert!(registry.get(&ActionRef::new("orders", "list")).is_none());
    }

    #[test]
    fn test_unregister_removes_the_action() {
        let registry = ActionRegistry::new();
        let show = ActionRef::new("orders", "show");
        registry.register(show.clone(), noop());

        assert!(registry.unregister(&show).is_some());
        assert!(registry.is_empty());
        assert!(registry.unregister(&show).is_none());
    }
}
