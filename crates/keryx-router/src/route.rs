//! Route construction and registration-time validation.

use http::Method;
use keryx_core::{ParamSource, ParameterDescriptor};
use thiserror::Error;

use crate::media::MediaRange;
use crate::params::PathParams;
use crate::template::{TemplateError, UrlTemplate};

/// Opaque identity of an application action.
///
/// A reference is a (handler, method) pair: the component that owns the
/// action and the specific operation on it. Routes carry the reference;
/// the action registry maps it to executable code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionRef {
    handler: String,
    method: String,
}

impl ActionRef {
    /// Creates a reference from handler and method identifiers.
    pub fn new(handler: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            method: method.into(),
        }
    }

    /// The owning handler's identifier.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// The operation identifier within the handler.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl std::fmt::Display for ActionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.handler, self.method)
    }
}

/// An interceptor declared on a route, with its configuration.
///
/// Bindings execute in declaration order. `kind` selects the registered
/// interceptor implementation; `config` is handed to it untouched on
/// every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorBinding {
    kind: String,
    config: serde_json::Value,
}

impl InterceptorBinding {
    /// Creates a binding for an interceptor kind.
    pub fn new(kind: impl Into<String>, config: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            config,
        }
    }

    /// The interceptor kind this binding selects.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The declared configuration value.
    #[must_use]
    pub const fn config(&self) -> &serde_json::Value {
        &self.config
    }
}

/// Error raised while building a route.
///
/// All of these fail registration; none can occur at request time.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The URL template is malformed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// More than one body-sourced parameter was declared.
    #[error("route '{template}' declares more than one body parameter")]
    MultipleBodyParameters {
        /// The offending template.
        template: String,
    },

    /// A body-sourced parameter carried a name.
    #[error("body parameter must not carry a name, found '{name}'")]
    NamedBodyParameter {
        /// The name that should not be there.
        name: String,
    },

    /// A non-body parameter was declared without a name.
    #[error("{kind} parameter requires a name")]
    UnnamedParameter {
        /// The source of the unnamed parameter.
        kind: ParamSource,
    },

    /// A path parameter has no placeholder to capture from.
    #[error("path parameter '{name}' has no matching placeholder in '{template}'")]
    PathParamWithoutPlaceholder {
        /// The declared parameter name.
        name: String,
        /// The template that lacks it.
        template: String,
    },

    /// A declared media type pattern failed to parse.
    #[error("invalid media type pattern '{pattern}'")]
    InvalidMediaType {
        /// The pattern as written.
        pattern: String,
        /// The parser's diagnosis.
        #[source]
        source: mime::FromStrError,
    },

    /// A produced media type contained a wildcard.
    #[error("produced media type must be concrete, got '{pattern}'")]
    WildcardProduces {
        /// The wildcard pattern.
        pattern: String,
    },
}

/// An immutable descriptor of one exposed action.
///
/// Built once at registration through [`Route::builder`] and never
/// mutated afterwards; the router shares routes across requests behind
/// an `Arc`.
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    template: UrlTemplate,
    action: ActionRef,
    params: Vec<ParameterDescriptor>,
    accepts: Vec<MediaRange>,
    produces: Vec<MediaRange>,
    interceptors: Vec<InterceptorBinding>,
}

impl Route {
    /// Starts building a route for a verb, template, and action.
    #[must_use]
    pub fn builder(method: Method, template: impl Into<String>, action: ActionRef) -> RouteBuilder {
        RouteBuilder {
            method,
            template: template.into(),
            action,
            params: Vec::new(),
            accepts: Vec::new(),
            produces: Vec::new(),
            interceptors: Vec::new(),
        }
    }

    /// The HTTP verb this route answers.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The compiled URL template.
    #[must_use]
    pub const fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// The action this route dispatches to.
    #[must_use]
    pub const fn action(&self) -> &ActionRef {
        &self.action
    }

    /// Declared parameters, in binding order.
    #[must_use]
    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    /// Accepted request content type patterns.
    #[must_use]
    pub fn accepts(&self) -> &[MediaRange] {
        &self.accepts
    }

    /// Produced response content types.
    #[must_use]
    pub fn produces(&self) -> &[MediaRange] {
        &self.produces
    }

    /// Declared interceptor bindings, in declaration order.
    #[must_use]
    pub fn interceptors(&self) -> &[InterceptorBinding] {
        &self.interceptors
    }

    /// Matches a concrete path against this route's template.
    #[must_use]
    pub fn matches_path(&self, path: &str) -> Option<PathParams> {
        self.template.capture(path)
    }
}

/// Builder for [`Route`].
#[derive(Debug)]
pub struct RouteBuilder {
    method: Method,
    template: String,
    action: ActionRef,
    params: Vec<ParameterDescriptor>,
    accepts: Vec<String>,
    produces: Vec<String>,
    interceptors: Vec<InterceptorBinding>,
}

impl RouteBuilder {
    /// Appends a parameter declaration.
    #[must_use]
    pub fn param(mut self, descriptor: ParameterDescriptor) -> Self {
        self.params.push(descriptor);
        self
    }

    /// Adds an accepted content type pattern. Wildcards are allowed.
    #[must_use]
    pub fn accepts(mut self, pattern: impl Into<String>) -> Self {
        self.accepts.push(pattern.into());
        self
    }

    /// Adds a produced content type. Must be concrete.
    #[must_use]
    pub fn produces(mut self, media_type: impl Into<String>) -> Self {
        self.produces.push(media_type.into());
        self
    }

    /// Appends an interceptor binding. Order is execution order.
    #[must_use]
    pub fn interceptor(mut self, binding: InterceptorBinding) -> Self {
        self.interceptors.push(binding);
        self
    }

    /// Validates the declaration and compiles the route.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] for a malformed template,
    /// incoherent parameter declarations, or invalid media types.
    pub fn build(self) -> Result<Route, RegistrationError> {
        let template = UrlTemplate::parse(&self.template)?;

        check_params(&self.params, &template, &self.template)?;
        if count_body_params(&self.params) > 1 {
            return Err(RegistrationError::MultipleBodyParameters {
                template: self.template,
            });
        }

        let accepts = parse_media(&self.accepts)?;
        let produces = parse_media(&self.produces)?;
        if let Some(wild) = produces.iter().find(|p| !p.is_concrete()) {
            return Err(RegistrationError::WildcardProduces {
                pattern: wild.to_string(),
            });
        }

        Ok(Route {
            method: self.method,
            template,
            action: self.action,
            params: self.params,
            accepts,
            produces,
            interceptors: self.interceptors,
        })
    }
}

fn parse_media(patterns: &[String]) -> Result<Vec<MediaRange>, RegistrationError> {
    patterns
        .iter()
        .map(|pattern| {
            MediaRange::parse(pattern).map_err(|source| RegistrationError::InvalidMediaType {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn count_body_params(params: &[ParameterDescriptor]) -> usize {
    params
        .iter()
        .map(|p| {
            let own = usize::from(p.source() == ParamSource::Body);
            own + count_body_params(p.nested())
        })
        .sum()
}

fn check_params(
    params: &[ParameterDescriptor],
    template: &UrlTemplate,
    raw_template: &str,
) -> Result<(), RegistrationError> {
    for param in params {
        match (param.source(), param.name()) {
            (ParamSource::Body, Some(name)) => {
                return Err(RegistrationError::NamedBodyParameter {
                    name: name.to_string(),
                });
            }
            (ParamSource::Body, None) => {}
            (kind, None) => return Err(RegistrationError::UnnamedParameter { kind }),
            (ParamSource::Path, Some(name)) => {
                if !template.has_placeholder(name) {
                    return Err(RegistrationError::PathParamWithoutPlaceholder {
                        name: name.to_string(),
                        template: raw_template.to_string(),
                    });
                }
            }
            _ => {}
        }
        check_params(param.nested(), template, raw_template)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keryx_core::ValueType;

    fn action() -> ActionRef {
        ActionRef::new("OrderHandler", "show")
    }

    #[test]
    fn test_action_ref_display() {
        assert_eq!(action().to_string(), "OrderHandler::show");
    }

    #[test]
    fn test_build_minimal_route() {
        let route = Route::builder(Method::GET, "/orders/{id}", action())
            .param(ParameterDescriptor::path("id", ValueType::I64))
            .build()
            .unwrap();

        assert_eq!(route.method(), &Method::GET);
        assert_eq!(route.template().as_str(), "/orders/{id}");
        assert_eq!(route.params().len(), 1);
        assert!(route.accepts().is_empty());
        assert!(route.produces().is_empty());
    }

    #[test]
    fn test_build_with_negotiation_and_interceptors() {
        let route = Route::builder(Method::POST, "/orders", action())
            .accepts("application/json")
            .accepts("text/*")
            .produces("application/json")
            .interceptor(InterceptorBinding::new("audit", serde_json::json!({"level": "full"})))
            .build()
            .unwrap();

        assert_eq!(route.accepts().len(), 2);
        assert_eq!(route.produces().len(), 1);
        assert_eq!(route.interceptors()[0].kind(), "audit");
    }

    #[test]
    fn test_build_rejects_malformed_template() {
        let err = Route::builder(Method::GET, "/orders/{id", action())
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Template(_)));
    }

    #[test]
    fn test_build_rejects_two_body_parameters() {
        let err = Route::builder(Method::POST, "/orders", action())
            .param(ParameterDescriptor::body())
            .param(ParameterDescriptor::body())
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MultipleBodyParameters { .. }));
    }

    #[test]
    fn test_build_rejects_named_body_parameter() {
        let named_body = ParameterDescriptor::new(
            Some("payload".to_string()),
            ParamSource::Body,
            ValueType::Json,
        );
        let err = Route::builder(Method::POST, "/orders", action())
            .param(named_body)
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::NamedBodyParameter { .. }));
    }

    #[test]
    fn test_build_rejects_unnamed_query_parameter() {
        let unnamed = ParameterDescriptor::new(None, ParamSource::Query, ValueType::Text);
        let err = Route::builder(Method::GET, "/orders", action())
            .param(unnamed)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::UnnamedParameter {
                kind: ParamSource::Query
            }
        ));
    }

    #[test]
    fn test_build_rejects_path_param_without_placeholder() {
        let err = Route::builder(Method::GET, "/orders", action())
            .param(ParameterDescriptor::path("id", ValueType::I64))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::PathParamWithoutPlaceholder { .. }
        ));
    }

    #[test]
    fn test_build_rejects_wildcard_produces() {
        let err = Route::builder(Method::GET, "/orders", action())
            .produces("text/*")
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::WildcardProduces { .. }));
    }

    #[test]
    fn test_build_rejects_invalid_media_type() {
        let err = Route::builder(Method::GET, "/orders", action())
            .accepts("not a media type")
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidMediaType { .. }));
    }

    #[test]
    fn test_body_inside_bean_counts_toward_limit() {
        let bean = ParameterDescriptor::bean(
            "form",
            vec![
                ParameterDescriptor::query("page", ValueType::U32),
                ParameterDescriptor::body(),
            ],
        );
        let err = Route::builder(Method::POST, "/orders", action())
            .param(bean)
            .param(ParameterDescriptor::body())
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MultipleBodyParameters { .. }));
    }

    #[test]
    fn test_matches_path_delegates_to_template() {
        let route = Route::builder(Method::GET, "/orders/{id}", action())
            .param(ParameterDescriptor::path("id", ValueType::I64))
            .build()
            .unwrap();

        let params = route.matches_path("/orders/9").unwrap();
        assert_eq!(params.get("id"), Some("9"));
        assert!(route.matches_path("/orders").is_none());
    }
}
