//! Test response inspection.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use keryx_core::Response;
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A rendered response with helper methods for assertions.
///
/// Rendering happens once, up front, so the body can be inspected as
/// bytes, text, or JSON any number of times.
#[derive(Debug)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Renders a dispatcher response for inspection.
    #[must_use]
    pub fn from_response(response: Response) -> Self {
        let (parts, body) = response.into_http().into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// Creates a response from raw parts.
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// The status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// True for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// True for 4xx statuses.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// True for 5xx statuses.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// All response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// A header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(header::CONTENT_TYPE.as_str())
    }

    /// The rendered body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body as text.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::BodyEncoding`] if the body is not UTF-8.
    pub fn text(&self) -> Result<String, TestError> {
        Ok(String::from_utf8(self.body.to_vec())?)
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TestError::Json`] if the body does not parse into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

impl From<Response> for TestResponse {
    fn from(response: Response) -> Self {
        Self::from_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_round_trips() {
        let response = Response::json(StatusCode::OK, serde_json::json!({"id": 7}));
        let inspected = TestResponse::from_response(response);

        assert!(inspected.is_success());
        assert_eq!(inspected.content_type(), Some("application/json"));
        let value: serde_json::Value = inspected.json().unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_text_body_reads_back() {
        let response = Response::text(StatusCode::NOT_FOUND, "missing");
        let inspected = TestResponse::from_response(response);

        assert!(inspected.is_client_error());
        assert_eq!(inspected.text().unwrap(), "missing");
    }
}
