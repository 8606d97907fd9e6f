//! Parameter declarations.
//!
//! Routes describe how their action's arguments are produced with an
//! ordered list of [`ParameterDescriptor`]s. Each descriptor names a
//! [`ParamSource`] (where the value comes from) and a [`ValueType`] (what
//! it coerces to). The binder walks the list in order and resolves only
//! what is declared; request data no descriptor mentions is never touched.

use std::fmt;

/// Where a parameter's value is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamSource {
    /// A placeholder captured from the URL path.
    Path,
    /// A field of the query string.
    Query,
    /// A field of a form-encoded request body.
    Form,
    /// Request-derived data: headers, cookies, or the request itself.
    Http,
    /// The decoded request body.
    Body,
    /// A composite assembled from nested descriptors.
    Bean,
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Form => write!(f, "form"),
            Self::Http => write!(f, "http"),
            Self::Body => write!(f, "body"),
            Self::Bean => write!(f, "bean"),
        }
    }
}

/// The declared type a raw value is coerced to.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    /// UTF-8 text, passed through unchanged.
    Text,
    /// `true` or `false`.
    Bool,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// One of a fixed set of names, matched case-sensitively.
    Enum {
        /// The allowed names.
        variants: Vec<String>,
    },
    /// The live request, injected as-is.
    Request,
    /// A cookie looked up by the parameter's name.
    Cookie,
    /// A decoded body value.
    Json,
    /// A composite built from nested descriptors.
    Composite,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::I8 => write!(f, "i8"),
            Self::I16 => write!(f, "i16"),
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::U8 => write!(f, "u8"),
            Self::U16 => write!(f, "u16"),
            Self::U32 => write!(f, "u32"),
            Self::U64 => write!(f, "u64"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
            Self::Enum { .. } => write!(f, "enum"),
            Self::Request => write!(f, "request"),
            Self::Cookie => write!(f, "cookie"),
            Self::Json => write!(f, "json"),
            Self::Composite => write!(f, "composite"),
        }
    }
}

/// Declaration of a single action parameter.
///
/// Descriptors are ordered: the binder produces one argument per
/// descriptor, in declaration order. A body-sourced descriptor carries no
/// name (there is nothing to look up; the whole decoded body is the
/// value), and a route may declare at most one of them.
///
/// # Example
///
/// ```
/// use keryx_core::{ParamSource, ParameterDescriptor, ValueType};
///
/// let limit = ParameterDescriptor::query("limit", ValueType::U32).with_default("20");
/// assert_eq!(limit.name(), Some("limit"));
/// assert_eq!(limit.source(), ParamSource::Query);
/// assert_eq!(limit.default_value(), Some("20"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name: Option<String>,
    source: ParamSource,
    value_type: ValueType,
    default: Option<String>,
    nested: Vec<ParameterDescriptor>,
}

impl ParameterDescriptor {
    /// Creates a descriptor from raw parts.
    ///
    /// The coherence rules (body descriptors are unnamed, everything else
    /// is named) are enforced when the owning route is built, so malformed
    /// declarations fail at registration rather than per request.
    #[must_use]
    pub fn new(name: Option<String>, source: ParamSource, value_type: ValueType) -> Self {
        Self {
            name,
            source,
            value_type,
            default: None,
            nested: Vec::new(),
        }
    }

    /// Declares a parameter bound from a path placeholder.
    #[must_use]
    pub fn path(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(Some(name.into()), ParamSource::Path, value_type)
    }

    /// Declares a parameter bound from the query string.
    #[must_use]
    pub fn query(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(Some(name.into()), ParamSource::Query, value_type)
    }

    /// Declares a parameter bound from form-encoded body fields.
    #[must_use]
    pub fn form(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(Some(name.into()), ParamSource::Form, value_type)
    }

    /// Declares a parameter bound from request data.
    ///
    /// What the name means depends on the value type: for [`ValueType::Cookie`]
    /// it is a cookie name, for [`ValueType::Request`] it is ignored, and for
    /// everything else it names a context entry or header.
    #[must_use]
    pub fn http(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(Some(name.into()), ParamSource::Http, value_type)
    }

    /// Declares the single body parameter: the decoded request body.
    #[must_use]
    pub fn body() -> Self {
        Self::new(None, ParamSource::Body, ValueType::Json)
    }

    /// Declares a composite parameter assembled from nested descriptors.
    #[must_use]
    pub fn bean(name: impl Into<String>, fields: Vec<ParameterDescriptor>) -> Self {
        Self {
            name: Some(name.into()),
            source: ParamSource::Bean,
            value_type: ValueType::Composite,
            default: None,
            nested: fields,
        }
    }

    /// Attaches a default, kept as text and coerced only when used.
    #[must_use]
    pub fn with_default(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    /// Returns the parameter name, absent only for body parameters.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the name used in error messages: the declared name, or
    /// `"body"` for the body parameter.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("body")
    }

    /// Returns the source.
    #[must_use]
    pub const fn source(&self) -> ParamSource {
        self.source
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Returns the raw default value, if declared.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns the nested descriptors of a bean parameter.
    #[must_use]
    pub fn nested(&self) -> &[ParameterDescriptor] {
        &self.nested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_descriptor_is_unnamed() {
        let body = ParameterDescriptor::body();
        assert_eq!(body.name(), None);
        assert_eq!(body.display_name(), "body");
        assert_eq!(body.source(), ParamSource::Body);
        assert_eq!(*body.value_type(), ValueType::Json);
    }

    #[test]
    fn test_default_is_kept_raw() {
        let d = ParameterDescriptor::query("page", ValueType::I32).with_default("1");
        assert_eq!(d.default_value(), Some("1"));
    }

    #[test]
    fn test_bean_holds_nested_fields() {
        let bean = ParameterDescriptor::bean(
            "pagination",
            vec![
                ParameterDescriptor::query("page", ValueType::U32),
                ParameterDescriptor::query("size", ValueType::U32).with_default("25"),
            ],
        );

        assert_eq!(bean.source(), ParamSource::Bean);
        assert_eq!(bean.nested().len(), 2);
        assert_eq!(bean.nested()[1].default_value(), Some("25"));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ParamSource::Path.to_string(), "path");
        assert_eq!(ParamSource::Query.to_string(), "query");
        assert_eq!(ParamSource::Form.to_string(), "form");
        assert_eq!(ParamSource::Http.to_string(), "http");
        assert_eq!(ParamSource::Body.to_string(), "body");
        assert_eq!(ParamSource::Bean.to_string(), "bean");
    }

    #[test]
    fn test_value_type_display() {
        assert_eq!(ValueType::Text.to_string(), "string");
        assert_eq!(ValueType::U16.to_string(), "u16");
        assert_eq!(
            ValueType::Enum { variants: vec!["asc".into(), "desc".into()] }.to_string(),
            "enum"
        );
    }
}
