//! Test request building.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use keryx_core::Request;
use serde::Serialize;

use crate::error::TestError;

/// Entry points for building requests to feed a dispatcher.
///
/// Each constructor returns a [`TestRequestBuilder`]; `build()` yields
/// the [`Request`] the dispatcher consumes.
#[derive(Debug, Clone, Copy)]
pub struct TestRequest;

impl TestRequest {
    /// Starts a GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Starts an OPTIONS request.
    pub fn options(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::OPTIONS, uri)
    }

    /// Starts a HEAD request.
    pub fn head(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::HEAD, uri)
    }
}

/// Builder for test requests.
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl TestRequestBuilder {
    /// Starts a builder for an arbitrary method.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Sets a header.
    ///
    /// # Panics
    ///
    /// Panics on names or values that are not valid HTTP; test input is
    /// expected to be well formed.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref()).expect("valid header name");
        let value = HeaderValue::try_from(value.as_ref()).expect("valid header value");
        self.headers.insert(name, value);
        self
    }

    /// Sets a typed header.
    pub fn header_typed(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the `Accept` header.
    pub fn accept(self, accept: impl AsRef<str>) -> Self {
        self.header(header::ACCEPT.as_str(), accept)
    }

    /// Sets the `Cookie` header from name/value pairs.
    pub fn cookies(self, pairs: &[(&str, &str)]) -> Self {
        let cookie = pairs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.header(header::COOKIE.as_str(), cookie)
    }

    /// Sets the `Authorization` header with a bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(
            header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.as_ref()),
        )
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets a JSON body and the matching `Content-Type`.
    ///
    /// # Panics
    ///
    /// Panics if the value does not serialize.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        let bytes = serde_json::to_vec(value).expect("JSON serialization should succeed");
        self.body = Some(Bytes::from(bytes));
        self.content_type("application/json")
    }

    /// Sets a form-urlencoded body and the matching `Content-Type`.
    ///
    /// # Panics
    ///
    /// Panics if the value does not encode as a flat form.
    pub fn form<T: Serialize>(mut self, value: &T) -> Self {
        let encoded = serde_urlencoded::to_string(value).expect("form encoding should succeed");
        self.body = Some(Bytes::from(encoded));
        self.content_type("application/x-www-form-urlencoded")
    }

    /// Assembles the request.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::RequestBuild`] when the URI does not parse.
    pub fn build(self) -> Result<Request, TestError> {
        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("invalid URI: {e}")))?;

        let mut request = Request::new(self.method, uri);
        for (name, value) in &self.headers {
            request = request.with_header(name.clone(), value.clone());
        }
        if let Some(body) = self.body {
            request = request.with_body(body);
        }
        Ok(request)
    }
}
