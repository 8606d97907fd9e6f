//! # Keryx Bind
//!
//! Typed parameter binding for matched routes.
//!
//! Given a route's ordered parameter declarations, the binder resolves
//! each one from its declared source (path capture, query string, form
//! field, header or cookie, decoded body, or a nested composite),
//! applies defaults, and coerces text into the declared type. Failures
//! are data: a [`BindError`] names the offending parameter and knows its
//! own status code, so the chain can answer the client without
//! unwinding.
//!
//! The request body is decoded at most once per request; the
//! [`BodyMemo`] carries the outcome across chain steps.

#![doc(html_root_url = "https://docs.rs/keryx-bind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod coerce;
mod error;

pub use binder::{Binder, BodyMemo};
pub use error::BindError;
