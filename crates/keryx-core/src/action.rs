//! Action invocation contract.
//!
//! An [`Action`] is the terminal step of the interception chain: the code
//! a route ultimately dispatches to. Actions receive their already-bound
//! arguments through an [`Invocation`] and produce an [`ActionResult`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::bag::DataBag;
use crate::error::ActionResult;
use crate::id::RequestId;
use crate::request::Request;
use crate::value::BindValue;

/// Boxed future used throughout the dispatch pipeline.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Everything an action may observe for one request.
///
/// Arguments arrive in the order of the route's parameter descriptors.
/// The bag is the same instance filters wrote to earlier in the chain.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    args: &'a [BindValue],
    bag: &'a DataBag,
    request: &'a Request,
    request_id: RequestId,
}

impl<'a> Invocation<'a> {
    /// Assembles an invocation.
    #[must_use]
    pub const fn new(
        args: &'a [BindValue],
        bag: &'a DataBag,
        request: &'a Request,
        request_id: RequestId,
    ) -> Self {
        Self { args, bag, request, request_id }
    }

    /// Bound arguments, in descriptor order.
    #[must_use]
    pub const fn args(&self) -> &'a [BindValue] {
        self.args
    }

    /// Argument at `index`, if bound.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&'a BindValue> {
        self.args.get(index)
    }

    /// The per-request data bag.
    #[must_use]
    pub const fn bag(&self) -> &'a DataBag {
        self.bag
    }

    /// The originating request.
    #[must_use]
    pub const fn request(&self) -> &'a Request {
        self.request
    }

    /// The request correlation id.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }
}

/// A dispatchable unit of application code.
///
/// Implementations must be cheap to share: the dispatcher holds them in
/// an `Arc` and invokes them concurrently across requests.
pub trait Action: Send + Sync {
    /// Runs the action with bound arguments.
    fn invoke<'a>(&'a self, invocation: Invocation<'a>) -> BoxFuture<'a, ActionResult>;
}

impl<T: Action + ?Sized> Action for Arc<T> {
    fn invoke<'a>(&'a self, invocation: Invocation<'a>) -> BoxFuture<'a, ActionResult> {
        (**self).invoke(invocation)
    }
}

/// Adapter turning an async closure into an [`Action`].
///
/// The closure must return an owned future, so any request data it needs
/// past the synchronous prologue has to be cloned out of the invocation:
///
/// ```
/// use http::StatusCode;
/// use keryx_core::{FnAction, Response};
///
/// let action = FnAction::new(|inv| {
///     let name = inv
///         .arg(0)
///         .and_then(|v| v.as_text())
///         .unwrap_or("anonymous")
///         .to_string();
///     Box::pin(async move { Ok(Response::text(StatusCode::OK, format!("hello {name}"))) })
/// });
/// # let _ = action;
/// ```
pub struct FnAction<F> {
    func: F,
}

impl<F> FnAction<F>
where
    F: Fn(Invocation<'_>) -> BoxFuture<'static, ActionResult> + Send + Sync + 'static,
{
    /// Wraps a closure as an action.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Action for FnAction<F>
where
    F: Fn(Invocation<'_>) -> BoxFuture<'static, ActionResult> + Send + Sync + 'static,
{
    fn invoke<'a>(&'a self, invocation: Invocation<'a>) -> BoxFuture<'a, ActionResult> {
        (self.func)(invocation)
    }
}

impl<F> std::fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAction").finish_non_exhaustive()
    }
}
