//! Argument resolution for matched routes.

use std::sync::Arc;

use indexmap::IndexMap;
use keryx_core::{
    BindValue, BodyDecoder, Cookie, DataBag, DecodeError, ParamSource, ParameterDescriptor,
    Request, Validator, ValueType,
};
use keryx_router::{PathParams, Route};

use crate::coerce::coerce;
use crate::error::BindError;

/// Memoized outcome of body decoding.
///
/// A body is decoded at most once per request, even when several chain
/// steps ask for it. The memo lives on the request context and is
/// shared with every binder invocation for that request; both success
/// and failure are remembered, so a broken body is not re-parsed either.
#[derive(Debug, Default)]
pub struct BodyMemo {
    state: Option<Result<Arc<serde_json::Value>, BindError>>,
}

impl BodyMemo {
    /// Creates an untouched memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once a body has been decoded successfully.
    #[must_use]
    pub fn is_decoded(&self) -> bool {
        matches!(self.state, Some(Ok(_)))
    }

    fn get_or_decode(
        &mut self,
        decoder: &dyn BodyDecoder,
        request: &Request,
    ) -> Result<Arc<serde_json::Value>, BindError> {
        let state = self.state.get_or_insert_with(|| {
            decoder
                .decode(request.body(), request.content_type())
                .map(Arc::new)
                .map_err(|err| match err {
                    DecodeError::UnsupportedMediaType(media) => {
                        BindError::unsupported_media(media)
                    }
                    other => BindError::undecodable(other.to_string()),
                })
        });
        match state {
            Ok(value) => Ok(Arc::clone(value)),
            Err(err) => Err(err.clone()),
        }
    }
}

/// Resolves a matched route's declared parameters against a request.
///
/// A binder is built per bind call from borrowed request state; the
/// descriptors are walked in declaration order and each produces exactly
/// one [`BindValue`]. Query and form data are parsed lazily, only when a
/// descriptor actually draws from them.
pub struct Binder<'a> {
    route: &'a Route,
    path_params: &'a PathParams,
    request: &'a Request,
    bag: &'a DataBag,
    decoder: &'a dyn BodyDecoder,
    validator: Option<&'a dyn Validator>,
    query: Option<Vec<(String, String)>>,
    form: Option<Vec<(String, String)>>,
}

impl<'a> Binder<'a> {
    /// Creates a binder over one request's state.
    #[must_use]
    pub fn new(
        route: &'a Route,
        path_params: &'a PathParams,
        request: &'a Request,
        bag: &'a DataBag,
        decoder: &'a dyn BodyDecoder,
        validator: Option<&'a dyn Validator>,
    ) -> Self {
        Self {
            route,
            path_params,
            request,
            bag,
            decoder,
            validator,
            query: None,
            form: None,
        }
    }

    /// Produces the action's argument array, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] encountered. User-facing errors
    /// (missing values, failed coercion, failed validation) identify the
    /// offending parameter; internal inconsistencies are flagged via
    /// [`BindError::is_internal`].
    pub fn bind(&mut self, memo: &mut BodyMemo) -> Result<Vec<BindValue>, BindError> {
        let descriptors = self.route.params();
        let mut args = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            args.push(self.resolve(descriptor, memo)?);
        }
        Ok(args)
    }

    fn resolve(
        &mut self,
        descriptor: &ParameterDescriptor,
        memo: &mut BodyMemo,
    ) -> Result<BindValue, BindError> {
        match descriptor.source() {
            ParamSource::Path => self.resolve_path(descriptor),
            ParamSource::Query => self.resolve_query(descriptor),
            ParamSource::Form => self.resolve_form(descriptor),
            ParamSource::Http => self.resolve_http(descriptor),
            ParamSource::Body => self.resolve_body(descriptor, memo),
            ParamSource::Bean => self.resolve_bean(descriptor, memo),
        }
    }

    fn resolve_path(&self, descriptor: &ParameterDescriptor) -> Result<BindValue, BindError> {
        let name = required_name(descriptor)?;
        self.path_params.get(name).map_or_else(
            || {
                Err(BindError::internal(
                    ParamSource::Path,
                    name,
                    "no captured value for declared placeholder",
                ))
            },
            |raw| coerce(raw, descriptor.value_type(), ParamSource::Path, name),
        )
    }

    fn resolve_query(&mut self, descriptor: &ParameterDescriptor) -> Result<BindValue, BindError> {
        let name = required_name(descriptor)?.to_string();
        let found = self
            .query_values()?
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, value)| value.clone());
        match found {
            Some(raw) => coerce(&raw, descriptor.value_type(), ParamSource::Query, &name),
            None => default_or_missing(descriptor, ParamSource::Query, &name),
        }
    }

    fn resolve_form(&mut self, descriptor: &ParameterDescriptor) -> Result<BindValue, BindError> {
        let name = required_name(descriptor)?.to_string();
        let found = self
            .form_values()?
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, value)| value.clone());
        match found {
            Some(raw) => coerce(&raw, descriptor.value_type(), ParamSource::Form, &name),
            None => default_or_missing(descriptor, ParamSource::Form, &name),
        }
    }

    fn resolve_http(&self, descriptor: &ParameterDescriptor) -> Result<BindValue, BindError> {
        match descriptor.value_type() {
            ValueType::Request => Ok(BindValue::Request(Box::new(self.request.clone()))),
            ValueType::Cookie => {
                let name = required_name(descriptor)?;
                match self.request.cookie(name) {
                    Some(value) => Ok(BindValue::Cookie(Cookie::new(name, value))),
                    None => descriptor.default_value().map_or_else(
                        || Err(BindError::missing(ParamSource::Http, name)),
                        |default| Ok(BindValue::Cookie(Cookie::new(name, default))),
                    ),
                }
            }
            _ => {
                let name = required_name(descriptor)?;
                let found = self
                    .bag
                    .get_str(name)
                    .map(ToString::to_string)
                    .or_else(|| self.request.header(name).map(ToString::to_string));
                match found {
                    Some(raw) => {
                        coerce(&raw, descriptor.value_type(), ParamSource::Http, name)
                    }
                    None => default_or_missing(descriptor, ParamSource::Http, name),
                }
            }
        }
    }

    fn resolve_body(
        &self,
        descriptor: &ParameterDescriptor,
        memo: &mut BodyMemo,
    ) -> Result<BindValue, BindError> {
        let value = memo.get_or_decode(self.decoder, self.request)?;
        match descriptor.value_type() {
            ValueType::Json => {
                if let Some(validator) = self.validator {
                    let violations = validator.validate(&value);
                    if !violations.is_empty() {
                        return Err(BindError::validation(
                            ParamSource::Body,
                            descriptor.display_name(),
                            &violations,
                        ));
                    }
                }
                Ok(BindValue::Json(value))
            }
            other => Err(BindError::internal(
                ParamSource::Body,
                descriptor.display_name(),
                format!("body cannot bind to type '{other}'"),
            )),
        }
    }

    fn resolve_bean(
        &mut self,
        descriptor: &ParameterDescriptor,
        memo: &mut BodyMemo,
    ) -> Result<BindValue, BindError> {
        let name = required_name(descriptor)?.to_string();
        let mut fields = IndexMap::new();
        for nested in descriptor.nested() {
            let value = self.resolve(nested, memo)?;
            fields.insert(nested.display_name().to_string(), value);
        }

        let bean = BindValue::Bean(fields);
        if let Some(validator) = self.validator {
            let violations = validator.validate(&bean.to_json());
            if !violations.is_empty() {
                return Err(BindError::validation(ParamSource::Bean, name, &violations));
            }
        }
        Ok(bean)
    }

    fn query_values(&mut self) -> Result<&[(String, String)], BindError> {
        if self.query.is_none() {
            let parsed = match self.request.query() {
                Some(qs) => serde_urlencoded::from_str(qs)
                    .map_err(|err| BindError::malformed(ParamSource::Query, err.to_string()))?,
                None => Vec::new(),
            };
            self.query = Some(parsed);
        }
        Ok(self.query.as_deref().unwrap_or(&[]))
    }

    fn form_values(&mut self) -> Result<&[(String, String)], BindError> {
        if self.form.is_none() {
            let parsed = self.parse_form()?;
            self.form = Some(parsed);
        }
        Ok(self.form.as_deref().unwrap_or(&[]))
    }

    fn parse_form(&self) -> Result<Vec<(String, String)>, BindError> {
        let is_form = self.request.content_type().is_some_and(|ct| {
            ct.split(';')
                .next()
                .unwrap_or(ct)
                .trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        });
        if !is_form || self.request.body().is_empty() {
            return Ok(Vec::new());
        }

        let text = std::str::from_utf8(self.request.body())
            .map_err(|_| BindError::malformed(ParamSource::Form, "body is not valid UTF-8"))?;
        serde_urlencoded::from_str(text)
            .map_err(|err| BindError::malformed(ParamSource::Form, err.to_string()))
    }
}

impl std::fmt::Debug for Binder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("route", &self.route.template().as_str())
            .field("request", &self.request.path())
            .finish_non_exhaustive()
    }
}

fn required_name(descriptor: &ParameterDescriptor) -> Result<&str, BindError> {
    descriptor.name().ok_or_else(|| {
        BindError::internal(
            descriptor.source(),
            "<unnamed>",
            "declared parameter has no name",
        )
    })
}

fn default_or_missing(
    descriptor: &ParameterDescriptor,
    source: ParamSource,
    name: &str,
) -> Result<BindValue, BindError> {
    match descriptor.default_value() {
        Some(default) => {
            coerce(default, descriptor.value_type(), source, name).map_err(|err| {
                BindError::internal(
                    source,
                    name,
                    format!("declared default '{default}' is not coercible: {err}"),
                )
            })
        }
        None => Err(BindError::missing(source, name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, StatusCode, Uri};
    use keryx_core::{JsonBodyDecoder, Violation};
    use keryx_router::{ActionRef, Route};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn action() -> ActionRef {
        ActionRef::new("Orders", "op")
    }

    fn get(uri: &'static str) -> Request {
        Request::new(Method::GET, Uri::from_static(uri))
    }

    fn bind_with(
        route: &Route,
        request: &Request,
        bag: &DataBag,
        memo: &mut BodyMemo,
    ) -> Result<Vec<BindValue>, BindError> {
        let params = route.matches_path(request.path()).unwrap_or_default();
        Binder::new(route, &params, request, bag, &JsonBodyDecoder, None).bind(memo)
    }

    fn bind(route: &Route, request: &Request) -> Result<Vec<BindValue>, BindError> {
        bind_with(route, request, &DataBag::new(), &mut BodyMemo::new())
    }

    #[test]
    fn test_path_parameter_is_coerced() {
        let route = Route::builder(Method::GET, "/orders/{id}", action())
            .param(ParameterDescriptor::path("id", ValueType::I64))
            .build()
            .unwrap();

        let args = bind(&route, &get("/orders/42")).unwrap();
        assert_eq!(args, vec![BindValue::I64(42)]);
    }

    #[test]
    fn test_path_coercion_failure_names_parameter() {
        let route = Route::builder(Method::GET, "/orders/{id}", action())
            .param(ParameterDescriptor::path("id", ValueType::I64))
            .build()
            .unwrap();

        let err = bind(&route, &get("/orders/abc")).unwrap_err();
        assert_eq!(err.parameter(), Some("id"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_internal());
    }

    #[test]
    fn test_missing_path_capture_is_internal() {
        let route = Route::builder(Method::GET, "/orders/{id}", action())
            .param(ParameterDescriptor::path("id", ValueType::I64))
            .build()
            .unwrap();

        let request = get("/orders/42");
        let empty = PathParams::new();
        let bag = DataBag::new();
        let err = Binder::new(&route, &empty, &request, &bag, &JsonBodyDecoder, None)
            .bind(&mut BodyMemo::new())
            .unwrap_err();

        assert!(err.is_internal());
        assert_eq!(err.parameter(), Some("id"));
    }

    #[test]
    fn test_query_parameter_and_default() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::query("limit", ValueType::U32).with_default("20"))
            .build()
            .unwrap();

        let args = bind(&route, &get("/orders?limit=5")).unwrap();
        assert_eq!(args, vec![BindValue::U32(5)]);

        let args = bind(&route, &get("/orders")).unwrap();
        assert_eq!(args, vec![BindValue::U32(20)]);
    }

    #[test]
    fn test_query_missing_without_default_fails() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::query("limit", ValueType::U32))
            .build()
            .unwrap();

        let err = bind(&route, &get("/orders")).unwrap_err();
        assert_eq!(err.parameter(), Some("limit"));
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
    }

    #[test]
    fn test_query_garbage_is_an_error_not_a_crash() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::query("limit", ValueType::I32).with_default("2"))
            .build()
            .unwrap();

        let err = bind(&route, &get("/orders?limit=abc")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(err.parameter(), Some("limit"));
    }

    #[test]
    fn test_query_first_value_wins() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::query("tag", ValueType::Text))
            .build()
            .unwrap();

        let args = bind(&route, &get("/orders?tag=a&tag=b")).unwrap();
        assert_eq!(args, vec![BindValue::Text("a".into())]);
    }

    #[test]
    fn test_misdeclared_default_is_internal() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::query("limit", ValueType::U32).with_default("plenty"))
            .build()
            .unwrap();

        let err = bind(&route, &get("/orders")).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_form_fields_bind_from_body() {
        let route = Route::builder(Method::POST, "/orders", action())
            .param(ParameterDescriptor::form("qty", ValueType::U16))
            .param(ParameterDescriptor::form("note", ValueType::Text))
            .build()
            .unwrap();

        let request = Request::new(Method::POST, Uri::from_static("/orders"))
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .with_body("qty=3&note=rush+order");

        let args = bind(&route, &request).unwrap();
        assert_eq!(
            args,
            vec![BindValue::U16(3), BindValue::Text("rush order".into())]
        );
    }

    #[test]
    fn test_form_absent_falls_back_to_default() {
        let route = Route::builder(Method::POST, "/orders", action())
            .param(ParameterDescriptor::form("qty", ValueType::U16).with_default("1"))
            .build()
            .unwrap();

        let request = Request::new(Method::POST, Uri::from_static("/orders"))
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .with_body("{}");

        let args = bind(&route, &request).unwrap();
        assert_eq!(args, vec![BindValue::U16(1)]);
    }

    #[test]
    fn test_header_binds_through_http_source() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::http("x-page-size", ValueType::U32))
            .build()
            .unwrap();

        let request = get("/orders").with_header(
            http::HeaderName::from_static("x-page-size"),
            http::HeaderValue::from_static("50"),
        );

        let args = bind(&route, &request).unwrap();
        assert_eq!(args, vec![BindValue::U32(50)]);
    }

    #[test]
    fn test_data_bag_wins_over_header() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::http("x-tenant", ValueType::Text))
            .build()
            .unwrap();

        let request = get("/orders").with_header(
            http::HeaderName::from_static("x-tenant"),
            http::HeaderValue::from_static("from-header"),
        );
        let mut bag = DataBag::new();
        bag.insert("x-tenant", "from-bag".to_string());

        let args = bind_with(&route, &request, &bag, &mut BodyMemo::new()).unwrap();
        assert_eq!(args, vec![BindValue::Text("from-bag".into())]);
    }

    #[test]
    fn test_cookie_binds_by_name() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::http("session", ValueType::Cookie))
            .build()
            .unwrap();

        let request = get("/orders").with_header(
            http::header::COOKIE,
            http::HeaderValue::from_static("theme=dark; session=s-99"),
        );

        let args = bind(&route, &request).unwrap();
        assert_eq!(args, vec![BindValue::Cookie(Cookie::new("session", "s-99"))]);
    }

    #[test]
    fn test_cookie_default_applies_when_absent() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(
                ParameterDescriptor::http("session", ValueType::Cookie).with_default("anonymous"),
            )
            .build()
            .unwrap();

        let args = bind(&route, &get("/orders")).unwrap();
        assert_eq!(
            args,
            vec![BindValue::Cookie(Cookie::new("session", "anonymous"))]
        );
    }

    #[test]
    fn test_request_injection() {
        let route = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::http("request", ValueType::Request))
            .build()
            .unwrap();

        let args = bind(&route, &get("/orders")).unwrap();
        match &args[0] {
            BindValue::Request(injected) => assert_eq!(injected.path(), "/orders"),
            other => panic!("expected request injection, got {other:?}"),
        }
    }

    #[test]
    fn test_body_binds_decoded_json() {
        let route = Route::builder(Method::POST, "/orders", action())
            .param(ParameterDescriptor::body())
            .build()
            .unwrap();

        let request = Request::new(Method::POST, Uri::from_static("/orders"))
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .with_body(r#"{"item":"widget"}"#);

        let args = bind(&route, &request).unwrap();
        match &args[0] {
            BindValue::Json(value) => assert_eq!(value["item"], "widget"),
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_is_a_client_error() {
        let route = Route::builder(Method::POST, "/orders", action())
            .param(ParameterDescriptor::body())
            .build()
            .unwrap();

        let request = Request::new(Method::POST, Uri::from_static("/orders"))
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .with_body("{nope");

        let err = bind(&route, &request).unwrap_err();
        assert_eq!(err.error_code(), "UNDECODABLE_BODY");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unsupported_body_media_type() {
        let route = Route::builder(Method::POST, "/orders", action())
            .param(ParameterDescriptor::body())
            .build()
            .unwrap();

        let request = Request::new(Method::POST, Uri::from_static("/orders"))
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("text/xml"),
            )
            .with_body("<order/>");

        let err = bind(&route, &request).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_body_is_decoded_at_most_once() {
        struct CountingDecoder {
            calls: AtomicUsize,
        }

        impl BodyDecoder for CountingDecoder {
            fn decode(
                &self,
                _body: &Bytes,
                _content_type: Option<&str>,
            ) -> Result<serde_json::Value, keryx_core::DecodeError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(serde_json::json!({"n": 1}))
            }
        }

        let route = Route::builder(Method::POST, "/orders", action())
            .param(ParameterDescriptor::body())
            .build()
            .unwrap();
        let request = Request::new(Method::POST, Uri::from_static("/orders")).with_body("{}");
        let decoder = CountingDecoder {
            calls: AtomicUsize::new(0),
        };
        let bag = DataBag::new();
        let params = PathParams::new();
        let mut memo = BodyMemo::new();

        for _ in 0..2 {
            let args = Binder::new(&route, &params, &request, &bag, &decoder, None)
                .bind(&mut memo)
                .unwrap();
            assert!(matches!(args[0], BindValue::Json(_)));
        }

        assert_eq!(decoder.calls.load(Ordering::SeqCst), 1);
        assert!(memo.is_decoded());
    }

    #[test]
    fn test_body_validation_failure_is_422() {
        struct RequireItem;

        impl Validator for RequireItem {
            fn validate(&self, body: &serde_json::Value) -> Vec<Violation> {
                if body.get("item").is_some() {
                    Vec::new()
                } else {
                    vec![Violation::new("item", "is required")]
                }
            }
        }

        let route = Route::builder(Method::POST, "/orders", action())
            .param(ParameterDescriptor::body())
            .build()
            .unwrap();
        let request = Request::new(Method::POST, Uri::from_static("/orders")).with_body("{}");
        let bag = DataBag::new();
        let params = PathParams::new();

        let err = Binder::new(
            &route,
            &params,
            &request,
            &bag,
            &JsonBodyDecoder,
            Some(&RequireItem),
        )
        .bind(&mut BodyMemo::new())
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.parameter(), Some("body"));
    }

    #[test]
    fn test_bean_assembles_nested_fields_in_order() {
        let bean = ParameterDescriptor::bean(
            "page",
            vec![
                ParameterDescriptor::query("number", ValueType::U32).with_default("1"),
                ParameterDescriptor::query(
                    "sort",
                    ValueType::Enum {
                        variants: vec!["asc".into(), "desc".into()],
                    },
                )
                .with_default("asc"),
            ],
        );
        let route = Route::builder(Method::GET, "/orders", action())
            .param(bean)
            .build()
            .unwrap();

        let args = bind(&route, &get("/orders?number=3&sort=desc")).unwrap();
        match &args[0] {
            BindValue::Bean(fields) => {
                let keys: Vec<_> = fields.keys().cloned().collect();
                assert_eq!(keys, vec!["number", "sort"]);
                assert_eq!(fields["number"], BindValue::U32(3));
                assert_eq!(fields["sort"], BindValue::Variant("desc".into()));
            }
            other => panic!("expected bean, got {other:?}"),
        }
    }

    #[test]
    fn test_bean_nested_failure_names_nested_parameter() {
        let bean = ParameterDescriptor::bean(
            "page",
            vec![ParameterDescriptor::query("number", ValueType::U32)],
        );
        let route = Route::builder(Method::GET, "/orders", action())
            .param(bean)
            .build()
            .unwrap();

        let err = bind(&route, &get("/orders")).unwrap_err();
        assert_eq!(err.parameter(), Some("number"));
    }

    #[test]
    fn test_bean_validation_names_the_bean() {
        struct PositiveNumber;

        impl Validator for PositiveNumber {
            fn validate(&self, value: &serde_json::Value) -> Vec<Violation> {
                match value.get("number").and_then(serde_json::Value::as_u64) {
                    Some(n) if n > 0 => Vec::new(),
                    _ => vec![Violation::new("number", "must be positive")],
                }
            }
        }

        let bean = ParameterDescriptor::bean(
            "page",
            vec![ParameterDescriptor::query("number", ValueType::U32).with_default("0")],
        );
        let route = Route::builder(Method::GET, "/orders", action())
            .param(bean)
            .build()
            .unwrap();
        let request = get("/orders");
        let bag = DataBag::new();
        let params = PathParams::new();

        let err = Binder::new(
            &route,
            &params,
            &request,
            &bag,
            &JsonBodyDecoder,
            Some(&PositiveNumber),
        )
        .bind(&mut BodyMemo::new())
        .unwrap_err();

        assert_eq!(err.parameter(), Some("page"));
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_unused_request_data_is_never_validated() {
        let route = Route::builder(Method::POST, "/orders", action())
            .build()
            .unwrap();

        let request = Request::new(Method::POST, Uri::from_static("/orders?limit=abc"))
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .with_body("{definitely not json");

        let args = bind(&route, &request).unwrap();
        assert!(args.is_empty());
    }
}
