//! Binding error types.
//!
//! A [`BindError`] identifies the parameter that could not be bound and
//! carries enough structure to render a client-facing response. User
//! errors (missing value, failed coercion, failed validation) map to
//! 400-class statuses; internal inconsistencies map to 500 and are
//! never blamed on the client.

use http::StatusCode;
use keryx_core::{ParamSource, Response, Violation};
use std::fmt;

/// Error raised while binding action parameters.
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use keryx_bind::BindError;
/// use keryx_core::ParamSource;
///
/// let err = BindError::missing(ParamSource::Query, "limit");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.parameter(), Some("limit"));
/// assert!(err.to_string().contains("limit"));
/// ```
#[derive(Debug, Clone)]
pub struct BindError {
    param_source: ParamSource,
    kind: BindErrorKind,
    parameter: Option<String>,
    message: String,
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindErrorKind {
    /// Required value absent and no default declared.
    Missing,
    /// Value present but not coercible to the declared type.
    Invalid,
    /// Composite or body value rejected by the validator.
    Validation,
    /// Body bytes could not be decoded at all.
    Undecodable,
    /// Body media type is not decodable by the configured decoder.
    UnsupportedMedia,
    /// Declaration and runtime state disagree; not a client error.
    Internal,
}

impl BindError {
    /// Creates an error for a required value that was not supplied.
    #[must_use]
    pub fn missing(source: ParamSource, parameter: impl Into<String>) -> Self {
        let parameter = parameter.into();
        Self {
            param_source: source,
            kind: BindErrorKind::Missing,
            message: format!("missing required {source} parameter '{parameter}'"),
            parameter: Some(parameter),
            details: None,
        }
    }

    /// Creates an error for a value that failed type coercion.
    #[must_use]
    pub fn invalid(
        source: ParamSource,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let parameter = parameter.into();
        let reason = reason.into();
        Self {
            param_source: source,
            kind: BindErrorKind::Invalid,
            message: format!("invalid {source} parameter '{parameter}': {reason}"),
            parameter: Some(parameter),
            details: None,
        }
    }

    /// Creates an error for a malformed request section that is not
    /// attributable to a single parameter, such as an unparseable query
    /// string.
    #[must_use]
    pub fn malformed(source: ParamSource, reason: impl Into<String>) -> Self {
        Self {
            param_source: source,
            kind: BindErrorKind::Invalid,
            message: format!("malformed {source} data: {}", reason.into()),
            parameter: None,
            details: None,
        }
    }

    /// Creates an error for a validator rejection.
    #[must_use]
    pub fn validation(
        source: ParamSource,
        parameter: impl Into<String>,
        violations: &[Violation],
    ) -> Self {
        let parameter = parameter.into();
        Self {
            param_source: source,
            kind: BindErrorKind::Validation,
            message: format!(
                "validation failed for {source} parameter '{parameter}' ({} violation{})",
                violations.len(),
                if violations.len() == 1 { "" } else { "s" }
            ),
            parameter: Some(parameter),
            details: serde_json::to_value(violations).ok(),
        }
    }

    /// Creates an error for a body that could not be decoded.
    #[must_use]
    pub fn undecodable(reason: impl Into<String>) -> Self {
        Self {
            param_source: ParamSource::Body,
            kind: BindErrorKind::Undecodable,
            message: format!("request body could not be decoded: {}", reason.into()),
            parameter: None,
            details: None,
        }
    }

    /// Creates an error for a body media type the decoder rejects.
    #[must_use]
    pub fn unsupported_media(media_type: impl Into<String>) -> Self {
        Self {
            param_source: ParamSource::Body,
            kind: BindErrorKind::UnsupportedMedia,
            message: format!("unsupported request media type '{}'", media_type.into()),
            parameter: None,
            details: None,
        }
    }

    /// Creates an internal-consistency error.
    ///
    /// These indicate a mismatch between a route's declaration and the
    /// runtime state, such as a declared path parameter missing from the
    /// captured placeholders.
    #[must_use]
    pub fn internal(
        source: ParamSource,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let parameter = parameter.into();
        Self {
            param_source: source,
            kind: BindErrorKind::Internal,
            message: format!(
                "internal binding failure for {source} parameter '{parameter}': {}",
                reason.into()
            ),
            parameter: Some(parameter),
            details: None,
        }
    }

    /// Returns the source the failing parameter was declared with.
    #[must_use]
    pub const fn param_source(&self) -> ParamSource {
        self.param_source
    }

    /// Returns the offending parameter name, when one is attributable.
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// Returns true for errors that indicate a broken declaration rather
    /// than bad client input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.kind == BindErrorKind::Internal
    }

    /// Returns the status code a response for this error should carry.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.kind {
            BindErrorKind::Missing | BindErrorKind::Invalid | BindErrorKind::Undecodable => {
                StatusCode::BAD_REQUEST
            }
            BindErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            BindErrorKind::UnsupportedMedia => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            BindErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code used in response envelopes.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self.kind {
            BindErrorKind::Missing => "MISSING_PARAMETER",
            BindErrorKind::Invalid => "INVALID_PARAMETER",
            BindErrorKind::Validation => "VALIDATION_FAILED",
            BindErrorKind::Undecodable => "UNDECODABLE_BODY",
            BindErrorKind::UnsupportedMedia => "UNSUPPORTED_MEDIA_TYPE",
            BindErrorKind::Internal => "BINDING_INTERNAL",
        }
    }

    /// Renders the error as a client-facing JSON response.
    ///
    /// Internal errors are not meant to be rendered this way; the chain
    /// converts them to a generic failure instead so declaration bugs
    /// never leak to clients.
    #[must_use]
    pub fn to_response(&self) -> Response {
        let mut envelope = serde_json::json!({
            "code": self.error_code(),
            "message": self.message,
        });
        if let Some(parameter) = &self.parameter {
            envelope["parameter"] = serde_json::Value::String(parameter.clone());
        }
        if let Some(details) = &self.details {
            envelope["details"] = details.clone();
        }

        Response::json(self.status_code(), envelope)
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BindError {}
