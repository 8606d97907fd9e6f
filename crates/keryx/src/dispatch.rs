//! The dispatcher: one front door from request to response.

use std::sync::Arc;
use std::time::Instant;

use http::header::{HeaderName, HeaderValue, ALLOW};
use http::{Method, StatusCode};
use keryx_chain::{FilterSet, InterceptorRegistry, RequestContext};
use keryx_core::{BodyDecoder, JsonBodyDecoder, Request, RequestId, Response, Validator};
use keryx_router::{PathParams, Resolution, Route, Router};

use crate::registry::ActionRegistry;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Resolves, binds, and runs requests against the registered routes.
///
/// The dispatcher owns the four registries a request passes through:
/// the [`Router`], the [`FilterSet`], the [`InterceptorRegistry`], and
/// the [`ActionRegistry`]. All of them take registrations through
/// shared references, so one dispatcher can serve requests while
/// routes are still being added.
///
/// [`dispatch`](Dispatcher::dispatch) never fails: resolution misses
/// become their 404/405/406 envelopes, client binding failures render
/// as 400-class responses, and everything that is not the client's
/// fault is logged and collapsed into an anonymous 500.
pub struct Dispatcher {
    router: Router,
    filters: FilterSet,
    interceptors: InterceptorRegistry,
    actions: ActionRegistry,
    decoder: Arc<dyn BodyDecoder>,
    validator: Option<Arc<dyn Validator>>,
}

impl Dispatcher {
    /// Creates a dispatcher with the default JSON body decoder and no
    /// validator.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a customized dispatcher.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder {
            decoder: None,
            validator: None,
        }
    }

    /// The route table requests resolve against.
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// The URL-scoped filters.
    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// The interceptor implementations routes bind by kind.
    #[must_use]
    pub const fn interceptors(&self) -> &InterceptorRegistry {
        &self.interceptors
    }

    /// The actions routes refer to.
    #[must_use]
    pub const fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Dispatches one request to completion.
    ///
    /// Every response leaves with an `x-request-id` header carrying the
    /// id assigned here, the same id the interception chain and the
    /// logs saw.
    pub async fn dispatch(&self, request: Request) -> Response {
        let start = Instant::now();
        let request_id = RequestId::new();
        let method = request.method().clone();
        let path = request.path().to_owned();

        let mut response = self.dispatch_with_id(request, request_id).await;
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let duration = start.elapsed();
        tracing::info!(
            %request_id,
            method = %method,
            path = %path,
            status = %response.status(),
            duration_ms = %duration.as_millis(),
            "request completed"
        );
        response
    }

    async fn dispatch_with_id(&self, request: Request, request_id: RequestId) -> Response {
        match self.router.resolve(&request) {
            Resolution::Matched { route, params } => {
                self.run_chain(request, route, params, request_id).await
            }
            Resolution::NotFound => {
                tracing::debug!(%request_id, path = request.path(), "no route matched");
                error_envelope(
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("no route matches {}", request.path()),
                    request_id,
                )
            }
            Resolution::MethodNotAllowed { allowed } => {
                tracing::debug!(
                    %request_id,
                    method = %request.method(),
                    path = request.path(),
                    "method not allowed"
                );
                let mut response = error_envelope(
                    StatusCode::METHOD_NOT_ALLOWED,
                    "method_not_allowed",
                    format!("{} is not allowed on {}", request.method(), request.path()),
                    request_id,
                );
                if let Ok(value) = HeaderValue::from_str(&join_methods(&allowed)) {
                    response.headers_mut().insert(ALLOW, value);
                }
                response
            }
            Resolution::NotAcceptable => {
                tracing::debug!(%request_id, path = request.path(), "content negotiation failed");
                error_envelope(
                    StatusCode::NOT_ACCEPTABLE,
                    "not_acceptable",
                    "no matching route can satisfy the requested representation".to_owned(),
                    request_id,
                )
            }
        }
    }

    async fn run_chain(
        &self,
        request: Request,
        route: Arc<Route>,
        params: PathParams,
        request_id: RequestId,
    ) -> Response {
        let Some(action) = self.actions.get(route.action()) else {
            tracing::error!(
                %request_id,
                action = %route.action(),
                "matched route names an unregistered action"
            );
            return internal_error(request_id);
        };

        let filters = self.filters.matching(request.path());
        let mut builder = RequestContext::builder(request, route, params, action)
            .request_id(request_id)
            .filters(filters)
            .interceptors(&self.interceptors)
            .decoder(Arc::clone(&self.decoder));
        if let Some(validator) = &self.validator {
            builder = builder.validator(Arc::clone(validator));
        }

        let mut chain = match builder.build() {
            Ok(chain) => chain,
            Err(err) => {
                tracing::error!(%request_id, error = %err, "failed to assemble interception chain");
                return internal_error(request_id);
            }
        };
        match chain.run().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%request_id, error = %err, "request processing failed");
                internal_error(request_id)
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.router.len())
            .field("filters", &self.filters.len())
            .field("interceptors", &self.interceptors.len())
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

/// Configures the parts of a [`Dispatcher`] that have defaults.
#[derive(Default)]
pub struct DispatcherBuilder {
    decoder: Option<Arc<dyn BodyDecoder>>,
    validator: Option<Arc<dyn Validator>>,
}

impl DispatcherBuilder {
    /// Replaces the body decoder used for body-sourced parameters.
    #[must_use]
    pub fn decoder(mut self, decoder: Arc<dyn BodyDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Installs a validator for body and bean parameters.
    #[must_use]
    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Produces the dispatcher with empty registries.
    #[must_use]
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            router: Router::new(),
            filters: FilterSet::new(),
            interceptors: InterceptorRegistry::new(),
            actions: ActionRegistry::new(),
            decoder: self
                .decoder
                .unwrap_or_else(|| Arc::new(JsonBodyDecoder::new())),
            validator: self.validator,
        }
    }
}

impl std::fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("decoder", &self.decoder.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

fn error_envelope(
    status: StatusCode,
    code: &str,
    message: String,
    request_id: RequestId,
) -> Response {
    Response::json(
        status,
        serde_json::json!({
            "code": code,
            "message": message,
            "request_id": request_id.to_string(),
        }),
    )
}

fn internal_error(request_id: RequestId) -> Response {
    error_envelope(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "an internal error occurred".to_owned(),
        request_id,
    )
}

fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
