//! Text-to-typed-value coercion.

use keryx_core::{BindValue, ParamSource, ValueType};

use crate::error::BindError;

/// Coerces raw text into the declared value type.
///
/// Used for every text-borne source: path captures, query and form
/// fields, headers, cookie values, and declared defaults. Integer and
/// float parsing is width-exact; enumeration names match
/// case-sensitively.
pub(crate) fn coerce(
    raw: &str,
    value_type: &ValueType,
    source: ParamSource,
    parameter: &str,
) -> Result<BindValue, BindError> {
    let bad = |expected: &str| {
        BindError::invalid(source, parameter, format!("expected {expected}, got '{raw}'"))
    };

    match value_type {
        ValueType::Text => Ok(BindValue::Text(raw.to_string())),
        ValueType::Bool => raw.parse().map(BindValue::Bool).map_err(|_| bad("bool")),
        ValueType::I8 => raw.parse().map(BindValue::I8).map_err(|_| bad("i8")),
        ValueType::I16 => raw.parse().map(BindValue::I16).map_err(|_| bad("i16")),
        ValueType::I32 => raw.parse().map(BindValue::I32).map_err(|_| bad("i32")),
        ValueType::I64 => raw.parse().map(BindValue::I64).map_err(|_| bad("i64")),
        ValueType::U8 => raw.parse().map(BindValue::U8).map_err(|_| bad("u8")),
        ValueType::U16 => raw.parse().map(BindValue::U16).map_err(|_| bad("u16")),
        ValueType::U32 => raw.parse().map(BindValue::U32).map_err(|_| bad("u32")),
        ValueType::U64 => raw.parse().map(BindValue::U64).map_err(|_| bad("u64")),
        ValueType::F32 => raw.parse().map(BindValue::F32).map_err(|_| bad("f32")),
        ValueType::F64 => raw.parse().map(BindValue::F64).map_err(|_| bad("f64")),
        ValueType::Enum { variants } => {
            if variants.iter().any(|v| v == raw) {
                Ok(BindValue::Variant(raw.to_string()))
            } else {
                Err(BindError::invalid(
                    source,
                    parameter,
                    format!("'{raw}' is not one of [{}]", variants.join(", ")),
                ))
            }
        }
        ValueType::Request
        | ValueType::Cookie
        | ValueType::Json
        | ValueType::Composite => Err(BindError::internal(
            source,
            parameter,
            format!("type '{value_type}' is not coercible from text"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce_ok(raw: &str, ty: &ValueType) -> BindValue {
        coerce(raw, ty, ParamSource::Query, "p").unwrap()
    }

    fn coerce_err(raw: &str, ty: &ValueType) -> BindError {
        coerce(raw, ty, ParamSource::Query, "p").unwrap_err()
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(coerce_ok("héllo", &ValueType::Text), BindValue::Text("héllo".into()));
    }

    #[test]
    fn test_bool_is_strict() {
        assert_eq!(coerce_ok("true", &ValueType::Bool), BindValue::Bool(true));
        assert_eq!(coerce_ok("false", &ValueType::Bool), BindValue::Bool(false));
        assert!(coerce_err("True", &ValueType::Bool).to_string().contains("bool"));
        coerce_err("1", &ValueType::Bool);
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(coerce_ok("-128", &ValueType::I8), BindValue::I8(-128));
        assert_eq!(coerce_ok("65535", &ValueType::U16), BindValue::U16(65535));
        assert_eq!(
            coerce_ok("-9223372036854775808", &ValueType::I64),
            BindValue::I64(i64::MIN)
        );
        assert_eq!(
            coerce_ok("18446744073709551615", &ValueType::U64),
            BindValue::U64(u64::MAX)
        );
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        coerce_err("128", &ValueType::I8);
        coerce_err("-1", &ValueType::U32);
        coerce_err("4294967296", &ValueType::U32);
    }

    #[test]
    fn test_integer_garbage_is_an_error() {
        let err = coerce_err("abc", &ValueType::I32);
        assert!(err.to_string().contains("expected i32"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_floats() {
        assert_eq!(coerce_ok("2.5", &ValueType::F32), BindValue::F32(2.5));
        assert_eq!(coerce_ok("-0.125", &ValueType::F64), BindValue::F64(-0.125));
        coerce_err("two", &ValueType::F64);
    }

    #[test]
    fn test_enum_is_case_sensitive() {
        let ty = ValueType::Enum {
            variants: vec!["Asc".into(), "Desc".into()],
        };

        assert_eq!(coerce_ok("Asc", &ty), BindValue::Variant("Asc".into()));
        let err = coerce_err("asc", &ty);
        assert!(err.to_string().contains("Asc, Desc"));
    }

    #[test]
    fn test_non_textual_types_are_internal_errors() {
        assert!(coerce_err("x", &ValueType::Json).is_internal());
        assert!(coerce_err("x", &ValueType::Composite).is_internal());
    }
}
