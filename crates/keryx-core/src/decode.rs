//! Request body decoding.
//!
//! The parameter binder never parses body bytes itself. It delegates to a
//! [`BodyDecoder`] and memoizes the outcome, so a body is decoded at most
//! once per request no matter how many parameters draw from it.

use bytes::Bytes;
use thiserror::Error;

/// Error returned when a request body cannot be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body was present but not well formed for its media type.
    #[error("malformed request body: {0}")]
    Malformed(String),

    /// The decoder does not understand the declared media type.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// A body parameter was requested but the request carried no body.
    #[error("request body is empty")]
    EmptyBody,
}

/// Decodes raw body bytes into a structured value.
///
/// Implementations are chosen per dispatcher, not per route. The decoded
/// value is cached for the remainder of the request.
pub trait BodyDecoder: Send + Sync {
    /// Decodes `body` into a JSON value.
    ///
    /// `content_type` is the request's declared media type, if any.
    fn decode(&self, body: &Bytes, content_type: Option<&str>) -> Result<serde_json::Value, DecodeError>;
}

/// Default decoder: JSON bodies only.
///
/// Accepts `application/json` and `+json` suffixed media types, and
/// requests with no declared `Content-Type` at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodyDecoder;

impl JsonBodyDecoder {
    /// Creates the decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BodyDecoder for JsonBodyDecoder {
    fn decode(&self, body: &Bytes, content_type: Option<&str>) -> Result<serde_json::Value, DecodeError> {
        if body.is_empty() {
            return Err(DecodeError::EmptyBody);
        }

        if let Some(declared) = content_type {
            let essence = declared.split(';').next().unwrap_or(declared).trim();
            let is_json = essence.eq_ignore_ascii_case("application/json") || essence.to_ascii_lowercase().ends_with("+json");
            if !is_json {
                return Err(DecodeError::UnsupportedMediaType(essence.to_string()));
            }
        }

        serde_json::from_slice(body).map_err(|e| DecodeError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json_object() {
        let decoder = JsonBodyDecoder::new();
        let body = Bytes::from_static(br#"{"name":"ada"}"#);

        let value = decoder.decode(&body, Some("application/json")).unwrap();
        assert_eq!(value["name"], "ada");
    }

    #[test]
    fn test_decode_json_suffix_media_type() {
        let decoder = JsonBodyDecoder::new();
        let body = Bytes::from_static(br#"[1,2]"#);

        let value = decoder.decode(&body, Some("application/vnd.acme+json")).unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }

    #[test]
    fn test_decode_without_content_type() {
        let decoder = JsonBodyDecoder::new();
        let body = Bytes::from_static(b"42");

        let value = decoder.decode(&body, None).unwrap();
        assert_eq!(value, serde_json::json!(42));
    }

    #[test]
    fn test_malformed_body() {
        let decoder = JsonBodyDecoder::new();
        let body = Bytes::from_static(b"{not json");

        let err = decoder.decode(&body, Some("application/json")).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_unsupported_media_type() {
        let decoder = JsonBodyDecoder::new();
        let body = Bytes::from_static(b"<xml/>");

        let err = decoder.decode(&body, Some("text/xml; charset=utf-8")).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedMediaType(ref t) if t == "text/xml"));
    }

    #[test]
    fn test_empty_body() {
        let decoder = JsonBodyDecoder::new();
        let err = decoder.decode(&Bytes::new(), Some("application/json")).unwrap_err();
        assert!(matches!(err, DecodeError::EmptyBody));
    }
}
