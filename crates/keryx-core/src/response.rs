//! The outgoing response model.
//!
//! A [`Response`] pairs a status code and headers with a [`Renderable`]
//! body. The body stays unrendered until the transport asks for bytes, so
//! filters can inspect and replace it without re-encoding.
//!
//! # Stock bodies
//!
//! | Body | Content-Type |
//! |------|--------------|
//! | [`TextBody`] | `text/plain; charset=utf-8` |
//! | [`JsonBody`] | `application/json` |
//! | [`RawBody`] | caller-supplied |
//! | [`EmptyBody`] | none |

use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};

/// A response body that knows its media type and can render itself.
pub trait Renderable: Send + Sync {
    /// Returns the media type this body renders as, if it has one.
    fn media_type(&self) -> Option<&str>;

    /// Renders the body to bytes.
    fn render(&self) -> Bytes;
}

/// Plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBody(String);

impl TextBody {
    /// Creates a text body.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl Renderable for TextBody {
    fn media_type(&self) -> Option<&str> {
        Some("text/plain; charset=utf-8")
    }

    fn render(&self) -> Bytes {
        Bytes::from(self.0.clone())
    }
}

/// JSON body backed by a [`serde_json::Value`].
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(serde_json::Value);

impl JsonBody {
    /// Creates a JSON body.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl Renderable for JsonBody {
    fn media_type(&self) -> Option<&str> {
        Some("application/json")
    }

    fn render(&self) -> Bytes {
        let body = serde_json::to_vec(&self.0).expect("JSON serialization failed");
        Bytes::from(body)
    }
}

/// Pre-rendered body with an explicit media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody {
    media_type: String,
    bytes: Bytes,
}

impl RawBody {
    /// Creates a raw body.
    #[must_use]
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl Renderable for RawBody {
    fn media_type(&self) -> Option<&str> {
        Some(&self.media_type)
    }

    fn render(&self) -> Bytes {
        self.bytes.clone()
    }
}

/// Empty body with no media type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyBody;

impl Renderable for EmptyBody {
    fn media_type(&self) -> Option<&str> {
        None
    }

    fn render(&self) -> Bytes {
        Bytes::new()
    }
}

/// A response descriptor produced by an action, a filter, an interceptor,
/// or the dispatcher itself.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use keryx_core::Response;
///
/// let response = Response::json(StatusCode::OK, serde_json::json!({"ok": true}));
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.body().media_type(), Some("application/json"));
/// ```
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Box<dyn Renderable>,
}

impl Response {
    /// Creates an empty-bodied response with the given status.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Box::new(EmptyBody),
        }
    }

    /// Creates a plain-text response.
    #[must_use]
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Box::new(TextBody::new(body)),
        }
    }

    /// Creates a JSON response.
    #[must_use]
    pub fn json(status: StatusCode, value: serde_json::Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Box::new(JsonBody::new(value)),
        }
    }

    /// Adds a header, replacing any previous value under the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the header map.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable view of the header map.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &dyn Renderable {
        self.body.as_ref()
    }

    /// Replaces the body.
    pub fn set_body(&mut self, body: impl Renderable + 'static) {
        self.body = Box::new(body);
    }

    /// Renders the body to bytes.
    #[must_use]
    pub fn render_body(&self) -> Bytes {
        self.body.render()
    }

    /// Converts into an [`http::Response`] for the transport.
    ///
    /// The body is rendered, and a `Content-Type` header is added from the
    /// body's media type unless one was set explicitly.
    #[must_use]
    pub fn into_http(self) -> http::Response<Bytes> {
        let mut headers = self.headers;
        if !headers.contains_key(header::CONTENT_TYPE) {
            if let Some(media_type) = self.body.media_type() {
                if let Ok(value) = HeaderValue::from_str(media_type) {
                    headers.insert(header::CONTENT_TYPE, value);
                }
            }
        }

        let mut response = http::Response::new(self.body.render());
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        response
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("media_type", &self.body.media_type())
            .finish()
    }
}
