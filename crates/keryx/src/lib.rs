//! # Keryx
//!
//! **Request dispatch core for the Themis Platform**
//!
//! Keryx turns an HTTP request into an action invocation in four
//! stages, each owned by one member crate:
//!
//! - **Routing** – URL templates with typed and greedy placeholders,
//!   resolved path-first so a wrong verb is a 405, not a 404
//! - **Interception** – URL-scoped filters and route-bound
//!   interceptors around every action, sharing one data bag
//! - **Binding** – declared parameters drawn lazily from path, query,
//!   form, headers, and a once-decoded body
//! - **Invocation** – actions looked up by opaque reference, with
//!   failures logged and collapsed into anonymous 500s
//!
//! ## Quick Start
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use keryx::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = Dispatcher::new();
//!
//! let show = ActionRef::new("Orders", "show");
//! dispatcher.actions().register_fn(show.clone(), |inv| {
//!     let id = inv.arg(0).and_then(BindValue::as_i64).unwrap_or(0);
//!     Box::pin(async move { Ok(Response::text(StatusCode::OK, format!("order {id}"))) })
//! });
//!
//! let route = Route::builder(Method::GET, "/orders/{id<[0-9]+>}", show)
//!     .param(ParameterDescriptor::path("id", ValueType::I64))
//!     .build()
//!     .unwrap();
//! dispatcher.router().register(route);
//!
//! let request = Request::new(Method::GET, "/orders/42".parse().unwrap());
//! let response = dispatcher.dispatch(request).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/keryx/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export member crates under short names
pub use keryx_bind as bind;
pub use keryx_chain as chain;
pub use keryx_core as core;
pub use keryx_router as router;

mod dispatch;
mod registry;

pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use registry::ActionRegistry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use keryx::prelude::*;
/// ```
pub mod prelude {
    pub use keryx_core::{
        Action, ActionError, ActionResult, BindValue, BodyDecoder, BoxFuture, DataBag, FnAction,
        Invocation, JsonBodyDecoder, ParamSource, ParameterDescriptor, Renderable, Request,
        RequestId, Response, Validator, ValueType,
    };

    pub use keryx_router::{
        ActionRef, InterceptorBinding, Resolution, ReverseError, Route, Router, UrlTemplate,
    };

    pub use keryx_bind::BindError;

    pub use keryx_chain::{
        ChainError, ChainResult, ChainState, Filter, FilterSet, FnFilter, FnInterceptor,
        Interceptor, InterceptorRegistry, RequestContext,
    };

    pub use crate::dispatch::Dispatcher;
    pub use crate::registry::ActionRegistry;
}
