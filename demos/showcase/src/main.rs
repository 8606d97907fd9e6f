//! Keryx Showcase
//!
//! Drives the keryx dispatcher end to end, entirely in process: routes
//! with constrained and greedy placeholders, a URL-scoped filter, a
//! configured interceptor, declared parameter binding, and reverse URL
//! construction. There is no transport here; requests are built by hand
//! and handed straight to the dispatcher, with the transcript printed
//! to stdout.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use http::{HeaderName, HeaderValue, Method, StatusCode, Uri};
use keryx::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

// =============================================================================
// Types
// =============================================================================

/// Order model.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: u64,
    pub item: String,
    pub quantity: u64,
}

// =============================================================================
// Application State
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    orders: Arc<RwLock<HashMap<u64, Order>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut orders = HashMap::new();
        orders.insert(
            1,
            Order {
                id: 1,
                item: "anvil".to_string(),
                quantity: 3,
            },
        );
        orders.insert(
            2,
            Order {
                id: 2,
                item: "rocket skates".to_string(),
                quantity: 1,
            },
        );
        Self {
            orders: Arc::new(RwLock::new(orders)),
            next_id: Arc::new(AtomicU64::new(3)),
        }
    }
}

// =============================================================================
// Filters and Interceptors
// =============================================================================

/// Rejects requests without an `x-api-key` header and records the key
/// in the shared data bag for downstream steps.
fn require_api_key<'a>(ctx: &'a mut RequestContext) -> BoxFuture<'a, ChainResult> {
    Box::pin(async move {
        match ctx.request().header("x-api-key").map(str::to_string) {
            Some(key) => {
                ctx.bag_mut().insert("caller", key);
                ctx.proceed().await
            }
            None => {
                warn!(path = %ctx.request().path(), "rejected request without an API key");
                Ok(Response::json(
                    StatusCode::UNAUTHORIZED,
                    serde_json::json!({
                        "code": "MISSING_API_KEY",
                        "message": "the x-api-key header is required",
                    }),
                ))
            }
        }
    })
}

/// Logs around the action, labelled per route via the binding config.
fn audit<'a>(
    ctx: &'a mut RequestContext,
    config: &'a serde_json::Value,
) -> BoxFuture<'a, ChainResult> {
    Box::pin(async move {
        let label = config["label"].as_str().unwrap_or("audit").to_string();
        let caller = ctx
            .bag()
            .get_str("caller")
            .unwrap_or("anonymous")
            .to_string();
        info!(label = %label, caller = %caller, "action starting");

        let result = ctx.proceed().await;
        match &result {
            Ok(response) => info!(label = %label, status = %response.status(), "action finished"),
            Err(err) => warn!(label = %label, error = %err, "action failed"),
        }
        result
    })
}

// =============================================================================
// Wiring
// =============================================================================

fn build_dispatcher(state: &AppState) -> Dispatcher {
    let dispatcher = Dispatcher::new();

    let list = ActionRef::new("Orders", "list");
    let show = ActionRef::new("Orders", "show");
    let create = ActionRef::new("Orders", "create");
    let docs = ActionRef::new("Docs", "page");

    {
        let state = state.clone();
        dispatcher.actions().register_fn(list.clone(), move |inv| {
            let limit = inv.arg(0).and_then(BindValue::as_u64).unwrap_or(10) as usize;
            let orders = state.orders.read().unwrap();
            let mut items: Vec<Order> = orders.values().cloned().collect();
            items.sort_by_key(|order| order.id);
            items.truncate(limit);
            let body = serde_json::json!({ "orders": items, "total": orders.len() });
            Box::pin(async move { Ok(Response::json(StatusCode::OK, body)) })
        });
    }

    {
        let state = state.clone();
        dispatcher.actions().register_fn(show.clone(), move |inv| {
            let id = inv.arg(0).and_then(BindValue::as_u64).unwrap_or(0);
            let found = state.orders.read().unwrap().get(&id).cloned();
            let response = match found {
                Some(order) => {
                    Response::json(StatusCode::OK, serde_json::to_value(&order).unwrap())
                }
                None => Response::json(
                    StatusCode::NOT_FOUND,
                    serde_json::json!({
                        "code": "ORDER_NOT_FOUND",
                        "message": format!("no order with id {id}"),
                    }),
                ),
            };
            Box::pin(async move { Ok(response) })
        });
    }

    {
        let state = state.clone();
        dispatcher.actions().register_fn(create.clone(), move |inv| {
            let response = match inv.arg(0) {
                Some(BindValue::Json(body)) => {
                    let item = body["item"].as_str().unwrap_or("unnamed").to_string();
                    let quantity = body["quantity"].as_u64().unwrap_or(1);
                    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
                    let order = Order { id, item, quantity };
                    state.orders.write().unwrap().insert(id, order.clone());
                    info!(order_id = id, item = %order.item, "created order");
                    Response::json(StatusCode::CREATED, serde_json::to_value(&order).unwrap())
                }
                _ => Response::new(StatusCode::BAD_REQUEST),
            };
            Box::pin(async move { Ok(response) })
        });
    }

    dispatcher.actions().register_fn(docs.clone(), |inv| {
        let page = match inv.arg(0) {
            Some(BindValue::Text(path)) => format!("# {path}\n\ndocumentation for {path}"),
            _ => "# index".to_string(),
        };
        Box::pin(async move { Ok(Response::text(StatusCode::OK, page)) })
    });

    let routes = [
        Route::builder(Method::GET, "/orders", list)
            .param(ParameterDescriptor::query("limit", ValueType::U32).with_default("10"))
            .produces("application/json")
            .interceptor(InterceptorBinding::new(
                "audit",
                serde_json::json!({ "label": "orders.list" }),
            ))
            .build()
            .unwrap(),
        Route::builder(Method::GET, "/orders/{id<[0-9]+>}", show)
            .param(ParameterDescriptor::path("id", ValueType::U64))
            .build()
            .unwrap(),
        Route::builder(Method::POST, "/orders", create)
            .param(ParameterDescriptor::body())
            .accepts("application/json")
            .interceptor(InterceptorBinding::new(
                "audit",
                serde_json::json!({ "label": "orders.create" }),
            ))
            .build()
            .unwrap(),
        Route::builder(Method::GET, "/docs/{page*}", docs)
            .param(ParameterDescriptor::path("page", ValueType::Text))
            .build()
            .unwrap(),
    ];
    for route in routes {
        dispatcher.router().register(route);
    }

    // A greedy pattern does not cover its bare prefix, so the key check
    // is registered for both shapes of /orders traffic.
    let api_key = Arc::new(FnFilter::new("require-api-key", require_api_key));
    dispatcher.filters().register("/orders", 10, api_key.clone()).unwrap();
    dispatcher
        .filters()
        .register("/orders/{rest*}", 10, api_key)
        .unwrap();

    dispatcher
        .interceptors()
        .register(Arc::new(FnInterceptor::new("audit", audit)));

    dispatcher
}

// =============================================================================
// Driving
// =============================================================================

fn authed(method: Method, uri: &'static str) -> Request {
    Request::new(method, Uri::from_static(uri)).with_header(
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_static("demo-key-1"),
    )
}

/// Dispatches one request and prints a transcript line.
async fn drive(dispatcher: &Dispatcher, request: Request) {
    let method = request.method().clone();
    let target = request.uri().to_string();

    let response = dispatcher.dispatch(request).await;

    let body = response.render_body();
    let text = String::from_utf8_lossy(&body);
    println!("{method} {target} -> {} {}", response.status(), text.trim());
    if let Some(allow) = response.headers().get(http::header::ALLOW) {
        println!("    allow: {}", allow.to_str().unwrap_or(""));
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let state = AppState::default();
    let dispatcher = build_dispatcher(&state);
    info!(
        routes = dispatcher.router().len(),
        actions = dispatcher.actions().len(),
        "dispatcher wired"
    );

    // Routed, filtered, and intercepted happy paths.
    drive(&dispatcher, authed(Method::GET, "/orders")).await;
    drive(&dispatcher, authed(Method::GET, "/orders?limit=1")).await;
    drive(&dispatcher, authed(Method::GET, "/orders/1")).await;

    // Resolution misses: constraint, verb, then content negotiation.
    drive(&dispatcher, authed(Method::GET, "/orders/first")).await;
    drive(&dispatcher, authed(Method::DELETE, "/orders/1")).await;
    drive(
        &dispatcher,
        authed(Method::GET, "/orders")
            .with_header(http::header::ACCEPT, HeaderValue::from_static("text/html")),
    )
    .await;

    // The filter turns away unauthenticated /orders traffic outright.
    drive(
        &dispatcher,
        Request::new(Method::GET, Uri::from_static("/orders")),
    )
    .await;

    // Body binding: a created order, then a body that fails to decode.
    drive(
        &dispatcher,
        authed(Method::POST, "/orders")
            .with_header(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .with_body(r#"{"item":"anvil","quantity":2}"#),
    )
    .await;
    drive(
        &dispatcher,
        authed(Method::POST, "/orders")
            .with_header(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .with_body("{not json"),
    )
    .await;

    // Greedy capture outside the filtered prefix: no key required.
    drive(
        &dispatcher,
        Request::new(
            Method::GET,
            Uri::from_static("/docs/guides/getting-started.md"),
        ),
    )
    .await;

    // Reverse routing builds URLs from the same templates; values the
    // template has no placeholder for become the query string.
    let show = ActionRef::new("Orders", "show");
    let url = dispatcher
        .router()
        .reverse(&show, &[("id", "2"), ("expand", "lines")])
        .unwrap();
    println!("reverse {show} -> {url}");
}
