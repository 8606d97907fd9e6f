//! Bound argument values.
//!
//! The binder turns raw request data into [`BindValue`]s, one per declared
//! parameter, preserving the exact declared width so actions receive the
//! type the route promised rather than a stringly-typed grab bag.

use crate::Request;
use indexmap::IndexMap;
use std::sync::Arc;

/// A cookie captured from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
}

impl Cookie {
    /// Creates a cookie value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cookie value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A single bound argument.
///
/// Integer and float variants mirror the declared widths exactly; a value
/// that does not fit its declared width is a binding error, never a silent
/// truncation.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Text, passed through unchanged.
    Text(String),
    /// Boolean.
    Bool(bool),
    /// 8-bit signed integer.
    I8(i8),
    /// 16-bit signed integer.
    I16(i16),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// 8-bit unsigned integer.
    U8(u8),
    /// 16-bit unsigned integer.
    U16(u16),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
    /// A validated enumeration name.
    Variant(String),
    /// A cookie captured from the request.
    Cookie(Cookie),
    /// The injected request.
    Request(Box<Request>),
    /// A decoded body value, shared with the per-request memo.
    Json(Arc<serde_json::Value>),
    /// A composite assembled from nested descriptors, in declaration order.
    Bean(IndexMap<String, BindValue>),
}

impl BindValue {
    /// Returns the text content of a `Text` value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean content of a `Bool` value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns any integer value widened to `i64`, if it fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::U8(v) => Some(i64::from(*v)),
            Self::U16(v) => Some(i64::from(*v)),
            Self::U32(v) => Some(i64::from(*v)),
            Self::U64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Returns any non-negative integer value widened to `u64`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U8(v) => Some(u64::from(*v)),
            Self::U16(v) => Some(u64::from(*v)),
            Self::U32(v) => Some(u64::from(*v)),
            Self::U64(v) => Some(*v),
            Self::I8(v) => u64::try_from(*v).ok(),
            Self::I16(v) => u64::try_from(*v).ok(),
            Self::I32(v) => u64::try_from(*v).ok(),
            Self::I64(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Returns a float value widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the name of a `Variant` value.
    #[must_use]
    pub fn variant_name(&self) -> Option<&str> {
        match self {
            Self::Variant(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the cookie of a `Cookie` value.
    #[must_use]
    pub const fn as_cookie(&self) -> Option<&Cookie> {
        match self {
            Self::Cookie(cookie) => Some(cookie),
            _ => None,
        }
    }

    /// Returns the injected request of a `Request` value.
    #[must_use]
    pub fn as_request(&self) -> Option<&Request> {
        match self {
            Self::Request(request) => Some(request),
            _ => None,
        }
    }

    /// Returns the decoded body of a `Json` value.
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the fields of a `Bean` value.
    #[must_use]
    pub const fn as_bean(&self) -> Option<&IndexMap<String, BindValue>> {
        match self {
            Self::Bean(fields) => Some(fields),
            _ => None,
        }
    }

    /// Returns a short name for the carried type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Variant(_) => "enum",
            Self::Cookie(_) => "cookie",
            Self::Request(_) => "request",
            Self::Json(_) => "json",
            Self::Bean(_) => "composite",
        }
    }

    /// Converts the value to JSON, for bean validation and logging.
    ///
    /// An injected request has no JSON form and maps to `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) | Self::Variant(s) => serde_json::Value::from(s.clone()),
            Self::Bool(b) => serde_json::Value::from(*b),
            Self::I8(v) => serde_json::Value::from(*v),
            Self::I16(v) => serde_json::Value::from(*v),
            Self::I32(v) => serde_json::Value::from(*v),
            Self::I64(v) => serde_json::Value::from(*v),
            Self::U8(v) => serde_json::Value::from(*v),
            Self::U16(v) => serde_json::Value::from(*v),
            Self::U32(v) => serde_json::Value::from(*v),
            Self::U64(v) => serde_json::Value::from(*v),
            Self::F32(v) => serde_json::Value::from(*v),
            Self::F64(v) => serde_json::Value::from(*v),
            Self::Cookie(cookie) => serde_json::Value::from(cookie.value().to_string()),
            Self::Request(_) => serde_json::Value::Null,
            Self::Json(value) => value.as_ref().clone(),
            Self::Bean(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widening() {
        assert_eq!(BindValue::I8(-5).as_i64(), Some(-5));
        assert_eq!(BindValue::U32(7).as_i64(), Some(7));
        assert_eq!(BindValue::U64(u64::MAX).as_i64(), None);
        assert_eq!(BindValue::I64(-1).as_u64(), None);
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let v = BindValue::Bool(true);
        assert_eq!(v.as_bool(), Some(true));
        assert_eq!(v.as_text(), None);
        assert_eq!(v.as_i64(), None);
    }

    #[test]
    fn test_bean_to_json_maps_fields() {
        let mut fields = IndexMap::new();
        fields.insert("size".to_string(), BindValue::U8(2));
        fields.insert("sort".to_string(), BindValue::Text("name".into()));
        let json = BindValue::Bean(fields).to_json();

        assert_eq!(json, serde_json::json!({"size": 2, "sort": "name"}));
    }

    #[test]
    fn test_cookie_to_json_is_its_value() {
        let v = BindValue::Cookie(Cookie::new("session", "abc"));
        assert_eq!(v.to_json(), serde_json::json!("abc"));
    }

    #[test]
    fn test_variant_to_json_is_its_name() {
        let v = BindValue::Variant("desc".into());
        assert_eq!(v.to_json(), serde_json::json!("desc"));
        assert_eq!(v.variant_name(), Some("desc"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(BindValue::U16(1).type_name(), "u16");
        assert_eq!(BindValue::Bean(IndexMap::new()).type_name(), "composite");
    }
}
