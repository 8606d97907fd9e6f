//! # Keryx Chain
//!
//! The interception chain that carries a resolved request to its action.
//!
//! A chain is built per request from three step kinds: filters matched
//! by URL pattern (outermost, ordered by priority), interceptors the
//! route declares by kind (in declaration order), and finally the
//! parameter binder plus action invocation. Every step receives the
//! same [`RequestContext`] and chooses whether the rest of the chain
//! runs by calling [`RequestContext::proceed`]; returning without
//! proceeding short-circuits with that step's response.
//!
//! Steps share one [`DataBag`](keryx_core::DataBag) for the lifetime of
//! the request. The bag is created with the chain and never replaced,
//! so a value a filter deposits is the very value the action reads.

#![doc(html_root_url = "https://docs.rs/keryx-chain/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod filter;
mod interceptor;

pub use context::{ChainBuilder, ChainState, RequestContext};
pub use error::{ChainError, ChainResult};
pub use filter::{Filter, FilterSet, FnFilter};
pub use interceptor::{FnInterceptor, Interceptor, InterceptorRegistry};
