//! # Keryx Core
//!
//! Core types and collaborator seams for the Keryx request dispatcher.
//!
//! This crate provides the foundational types used throughout Keryx:
//!
//! - [`Request`] / [`Response`] - The HTTP exchange model the dispatcher operates on
//! - [`RequestId`] - UUID v7 request correlation identifier
//! - [`ParameterDescriptor`] / [`BindValue`] - Declared action parameters and their bound values
//! - [`DataBag`] - Per-request key/value storage shared along the interception chain
//! - [`Action`] - The terminal invocation contract, with [`FnAction`] for closures
//! - [`BodyDecoder`] / [`Validator`] - Pluggable body decoding and validation seams

#![doc(html_root_url = "https://docs.rs/keryx-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod bag;
mod decode;
mod error;
mod id;
mod param;
mod request;
mod response;
mod validate;
mod value;

pub use action::{Action, BoxFuture, FnAction, Invocation};
pub use bag::DataBag;
pub use decode::{BodyDecoder, DecodeError, JsonBodyDecoder};
pub use error::{ActionError, ActionResult};
pub use id::RequestId;
pub use param::{ParamSource, ParameterDescriptor, ValueType};
pub use request::Request;
pub use response::{EmptyBody, JsonBody, RawBody, Renderable, Response, TextBody};
pub use validate::{Validator, Violation};
pub use value::{BindValue, Cookie};
