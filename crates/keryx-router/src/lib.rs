//! # Keryx Router
//!
//! Route registration and request resolution for the Keryx dispatcher.
//!
//! Routes pair an HTTP verb and a compiled URL template with an opaque
//! action reference, declared parameters, and content type constraints.
//! The router holds them in an immutable snapshot swapped out under a
//! write lock, so resolution never observes a half-updated table.
//!
//! Resolution is deterministic: the path is narrowed before the verb
//! (to tell 404 from 405), content negotiation runs on the verb
//! survivors, the most specific template wins, and remaining ties go to
//! the first registered route.
//!
//! # Example
//!
//! ```rust
//! use http::Method;
//! use keryx_router::{ActionRef, Resolution, Route, Router};
//!
//! let router = Router::new();
//! let route = Route::builder(
//!     Method::GET,
//!     "/orders/{id<[0-9]+>}",
//!     ActionRef::new("Orders", "show"),
//! )
//! .build()
//! .unwrap();
//! router.register(route);
//!
//! match router.resolve_parts(&Method::GET, "/orders/42", None, None) {
//!     Resolution::Matched { params, .. } => assert_eq!(params.get("id"), Some("42")),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/keryx-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod media;
mod params;
mod route;
mod router;
mod template;

pub use media::MediaRange;
pub use params::PathParams;
pub use route::{ActionRef, InterceptorBinding, RegistrationError, Route, RouteBuilder};
pub use router::{Resolution, ReverseError, Router};
pub use template::{TemplateError, UrlTemplate};
