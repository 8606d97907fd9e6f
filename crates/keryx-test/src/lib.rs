//! # Keryx Test
//!
//! Test utilities for Keryx: fluent request construction and response
//! inspection, fully in memory.
//!
//! Dispatching in Keryx is already an in-process async call, so there
//! is no client or transport to fake. Build a [`Request`] with
//! [`TestRequest`], hand it to a dispatcher, and wrap what comes back
//! in a [`TestResponse`] to assert on it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use keryx_test::{TestRequest, TestResponse};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_order() {
//!     let dispatcher = build_dispatcher();
//!
//!     let request = TestRequest::post("/orders")
//!         .json(&json!({"sku": "A-7", "quantity": 2}))
//!         .build()
//!         .unwrap();
//!     let response = TestResponse::from_response(dispatcher.dispatch(request).await);
//!
//!     assert_eq!(response.status(), 201);
//!     assert_eq!(response.json::<Order>().unwrap().sku, "A-7");
//! }
//! ```
//!
//! [`Request`]: keryx_core::Request

#![doc(html_root_url = "https://docs.rs/keryx-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod request;
mod response;

pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
