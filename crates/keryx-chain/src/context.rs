//! The per-request interception chain.
//!
//! A [`RequestContext`] owns everything one request accumulates on its
//! way to an action: the request itself, the matched route and its path
//! captures, the shared [`DataBag`], and the ordered steps still to run.
//! Steps hand control down the chain with [`RequestContext::proceed`]
//! and regain it when the rest of the chain finishes, so every step can
//! act both before and after its downstream.

use std::sync::Arc;

use keryx_bind::{Binder, BodyMemo};
use keryx_core::{
    Action, ActionError, BindValue, BodyDecoder, DataBag, Invocation, JsonBodyDecoder, Request,
    RequestId, Validator,
};
use keryx_router::{PathParams, Route};

use crate::error::{ChainError, ChainResult};
use crate::filter::Filter;
use crate::interceptor::{Interceptor, InterceptorRegistry};

/// Lifecycle of a chain.
///
/// A chain moves from `Created` to `Running` exactly once, then settles
/// in `Completed` or `Failed`. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Built but not yet run.
    Created,
    /// Steps are executing.
    Running,
    /// Produced a response, possibly by short-circuiting.
    Completed,
    /// A step, the binder, or the action failed.
    Failed,
}

/// One executable position in the chain.
#[derive(Clone)]
enum ChainStep {
    Filter(Arc<dyn Filter>),
    Interceptor {
        interceptor: Arc<dyn Interceptor>,
        /// Index into the route's interceptor bindings, for config lookup.
        binding: usize,
    },
    Invoke,
}

/// An active step, tracked while its future is being polled.
struct Frame {
    step: usize,
    proceeded: bool,
}

/// Per-request execution state, threaded through every chain step.
pub struct RequestContext {
    request: Request,
    request_id: RequestId,
    route: Arc<Route>,
    path_params: PathParams,
    action: Arc<dyn Action>,
    decoder: Arc<dyn BodyDecoder>,
    validator: Option<Arc<dyn Validator>>,
    steps: Vec<ChainStep>,
    cursor: usize,
    frames: Vec<Frame>,
    state: ChainState,
    bag: DataBag,
    body_memo: BodyMemo,
    bound_args: Vec<BindValue>,
}

impl RequestContext {
    /// Starts building a chain for one matched request.
    #[must_use]
    pub fn builder<'r>(
        request: Request,
        route: Arc<Route>,
        path_params: PathParams,
        action: Arc<dyn Action>,
    ) -> ChainBuilder<'r> {
        ChainBuilder {
            request,
            route,
            path_params,
            action,
            request_id: None,
            filters: Vec::new(),
            registry: None,
            decoder: None,
            validator: None,
        }
    }

    /// Runs the chain to completion.
    ///
    /// The first step runs immediately; each step decides whether the
    /// next one runs at all. A chain runs at most once.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Completed`] when called on a chain that
    /// already ran, and otherwise whatever error the steps, binder, or
    /// action produced. Binding failures caused by the client are not
    /// errors here: they complete the chain with their rendered
    /// response.
    pub async fn run(&mut self) -> ChainResult {
        if self.state != ChainState::Created {
            return Err(ChainError::Completed);
        }
        self.state = ChainState::Running;
        tracing::debug!(
            request_id = %self.request_id,
            path = self.request.path(),
            steps = self.steps.len(),
            "running interception chain"
        );

        let result = self.advance().await;
        self.state = if result.is_ok() {
            ChainState::Completed
        } else {
            ChainState::Failed
        };
        result
    }

    /// Hands control to the next step in the chain.
    ///
    /// Returns that step's result once the downstream chain finishes,
    /// so the caller can inspect or replace the response on the way
    /// back out. Not calling this short-circuits the chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::ProceededTwice`] when the current step has
    /// already proceeded, and [`ChainError::Completed`] when the chain
    /// is no longer running.
    pub async fn proceed(&mut self) -> ChainResult {
        if matches!(self.state, ChainState::Completed | ChainState::Failed) {
            return Err(ChainError::Completed);
        }
        let Some(&Frame { step, proceeded }) = self.frames.last() else {
            return Err(ChainError::Corrupted {
                message: "proceed() called outside a running chain".to_owned(),
            });
        };
        if proceeded {
            return Err(ChainError::ProceededTwice {
                step: self.step_name(step),
            });
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.proceeded = true;
        }
        self.advance().await
    }

    /// Starts the step at the cursor and waits for it to finish.
    async fn advance(&mut self) -> ChainResult {
        let index = self.cursor;
        self.cursor += 1;
        let Some(step) = self.steps.get(index).cloned() else {
            return Err(ChainError::Corrupted {
                message: format!("chain advanced past its final step (cursor {index})"),
            });
        };

        self.frames.push(Frame {
            step: index,
            proceeded: false,
        });
        let result = match step {
            ChainStep::Filter(filter) => filter.apply(self).await,
            ChainStep::Interceptor {
                interceptor,
                binding,
            } => {
                let route = Arc::clone(&self.route);
                match route.interceptors().get(binding) {
                    Some(declared) => interceptor.around(self, declared.config()).await,
                    None => Err(ChainError::Corrupted {
                        message: format!("interceptor binding {binding} is out of range"),
                    }),
                }
            }
            ChainStep::Invoke => self.invoke_action().await,
        };
        self.frames.pop();
        result
    }

    /// Binds the action's parameters and invokes it.
    ///
    /// Client-caused binding failures are rendered into their response
    /// here; only internal binding inconsistencies fail the chain.
    async fn invoke_action(&mut self) -> ChainResult {
        let bound = {
            let mut binder = Binder::new(
                &self.route,
                &self.path_params,
                &self.request,
                &self.bag,
                self.decoder.as_ref(),
                self.validator.as_deref(),
            );
            binder.bind(&mut self.body_memo)
        };
        match bound {
            Ok(args) => self.bound_args = args,
            Err(err) if err.is_internal() => {
                return Err(ChainError::Action(ActionError::with_source(
                    format!("binding parameters for '{}' failed", self.route.action()),
                    err,
                )));
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %self.request_id,
                    parameter = err.parameter(),
                    "parameter binding rejected the request"
                );
                return Ok(err.to_response());
            }
        }

        let action = Arc::clone(&self.action);
        let invocation = Invocation::new(
            &self.bound_args,
            &self.bag,
            &self.request,
            self.request_id,
        );
        action.invoke(invocation).await.map_err(ChainError::from)
    }

    fn step_name(&self, index: usize) -> String {
        match self.steps.get(index) {
            Some(ChainStep::Filter(filter)) => format!("filter '{}'", filter.name()),
            Some(ChainStep::Interceptor { interceptor, .. }) => {
                format!("interceptor '{}'", interceptor.kind())
            }
            Some(ChainStep::Invoke) => format!("action '{}'", self.route.action()),
            None => "an unknown step".to_owned(),
        }
    }

    /// The request being dispatched.
    #[must_use]
    pub const fn request(&self) -> &Request {
        &self.request
    }

    /// The identifier assigned to this request.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The matched route.
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Values captured from the request path.
    #[must_use]
    pub const fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// The data bag shared by every step of this chain.
    #[must_use]
    pub const fn bag(&self) -> &DataBag {
        &self.bag
    }

    /// Mutable access to the shared data bag.
    ///
    /// The bag itself lives as long as the chain; steps mutate it in
    /// place rather than replacing it.
    pub fn bag_mut(&mut self) -> &mut DataBag {
        &mut self.bag
    }

    /// Where the chain currently is in its lifecycle.
    #[must_use]
    pub const fn state(&self) -> ChainState {
        self.state
    }

    /// The arguments bound for the action, empty until binding ran.
    #[must_use]
    pub fn bound_args(&self) -> &[BindValue] {
        &self.bound_args
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("path", &self.request.path())
            .field("state", &self.state)
            .field("steps", &self.steps.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`RequestContext`] from a resolved request.
pub struct ChainBuilder<'r> {
    request: Request,
    route: Arc<Route>,
    path_params: PathParams,
    action: Arc<dyn Action>,
    request_id: Option<RequestId>,
    filters: Vec<Arc<dyn Filter>>,
    registry: Option<&'r InterceptorRegistry>,
    decoder: Option<Arc<dyn BodyDecoder>>,
    validator: Option<Arc<dyn Validator>>,
}

impl<'r> ChainBuilder<'r> {
    /// Uses a caller-assigned request id instead of generating one.
    #[must_use]
    pub fn request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    /// The filters to run, already ordered outermost first.
    #[must_use]
    pub fn filters(mut self, filters: Vec<Arc<dyn Filter>>) -> Self {
        self.filters = filters;
        self
    }

    /// The registry the route's interceptor bindings resolve against.
    #[must_use]
    pub fn interceptors(mut self, registry: &'r InterceptorRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Overrides the body decoder. Defaults to [`JsonBodyDecoder`].
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

    /// Resolves interceptor bindings and produces the runnable chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::UnknownInterceptor`] when the route binds
    /// an interceptor kind nothing is registered for.
    pub fn build(self) -> Result<RequestContext, ChainError> {
        let mut steps: Vec<ChainStep> =
            self.filters.into_iter().map(ChainStep::Filter).collect();
        for (binding, declared) in self.route.interceptors().iter().enumerate() {
            let interceptor = self
                .registry
                .and_then(|registry| registry.get(declared.kind()))
                .ok_or_else(|| ChainError::UnknownInterceptor {
                    kind: declared.kind().to_owned(),
                })?;
            steps.push(ChainStep::Interceptor {
                interceptor,
                binding,
            });
        }
        steps.push(ChainStep::Invoke);

        Ok(RequestContext {
            request: self.request,
            request_id: self.request_id.unwrap_or_else(RequestId::new),
            route: self.route,
            path_params: self.path_params,
            action: self.action,
            decoder: self
                .decoder
                .unwrap_or_else(|| Arc::new(JsonBodyDecoder::new())),
            validator: self.validator,
            steps,
            cursor: 0,
            frames: Vec::new(),
            state: ChainState::Created,
            bag: DataBag::new(),
            body_memo: BodyMemo::new(),
            bound_args: Vec::new(),
        })
    }
}

impl std::fmt::Debug for ChainBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("path", &self.request.path())
            .field("route", &self.route.template().as_str())
            .field("filters", &self.filters.len())
            .finish_non_exhaustive()
    }
}
