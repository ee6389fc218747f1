//! Per-request context and the chain execution cursor.
//!
//! One context is exclusively owned by one in-flight request. It carries
//! the request line, the extracted parameters, the resolved handler chain
//! and the execution cursor, plus the response surface the chain writes
//! into. Contexts are recycled through [`crate::pool::ContextPool`]; the
//! reset contract lives there.

use http::Method;
use trailhead_router::{Param, Params};

use crate::handler::HandlerChain;
use crate::response::Response;

/// Mutable per-request state.
///
/// # Chain execution
///
/// The cursor starts before the first handler. [`RequestContext::next`]
/// advances it and invokes that handler synchronously on the same call
/// stack, so the chain is a cooperative continuation: each handler calls
/// `next` exactly once by convention, and one that never advances
/// short-circuits everything after it (authentication rejections, cache
/// hits). Advancing past the end is a harmless no-op.
///
/// ```
/// use trailhead_core::RequestContext;
///
/// fn auth(ctx: &mut RequestContext) {
///     if ctx.param("token") == Some("secret") {
///         ctx.next();
///     } else {
///         ctx.response_mut().set_status(http::StatusCode::UNAUTHORIZED);
///     }
/// }
/// ```
pub struct RequestContext {
    method: Method,
    path: String,
    params: Params,
    chain: HandlerChain,
    /// Index of the next handler to invoke.
    cursor: usize,
    allowed: Vec<Method>,
    response: Response,
}

impl RequestContext {
    pub(crate) fn with_params_capacity(capacity: usize) -> Self {
        Self {
            method: Method::GET,
            path: String::new(),
            params: Params::with_capacity(capacity),
            chain: HandlerChain::default(),
            cursor: 0,
            allowed: Vec::new(),
            response: Response::default(),
        }
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path as dispatched.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The extracted path parameters, in walk order.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the value of the parameter named `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Returns the parameter at positional `index`.
    #[must_use]
    pub fn param_at(&self, index: usize) -> Option<&Param> {
        self.params.get_index(index)
    }

    /// Returns the catch-all capture, if the route ended in `*`.
    #[must_use]
    pub fn wildcard(&self) -> Option<&str> {
        self.params.wildcard()
    }

    /// The allowed-method set, populated for method-not-allowed
    /// dispatches and empty otherwise.
    #[must_use]
    pub fn allowed_methods(&self) -> &[Method] {
        &self.allowed
    }

    /// The response under construction.
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable access to the response.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Advances the cursor and invokes the next handler in the chain.
    ///
    /// Returns `false` without doing anything once the chain is
    /// exhausted, so stray extra advances cannot crash a request.
    pub fn next(&mut self) -> bool {
        let Some(handler) = self.chain.get(self.cursor).cloned() else {
            return false;
        };
        self.cursor += 1;
        handler.call(self);
        true
    }

    /// Kicks off the chain from before its first handler.
    pub(crate) fn run(&mut self) {
        self.next();
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub(crate) fn set_chain(&mut self, chain: HandlerChain) {
        self.chain = chain;
    }

    pub(crate) fn set_allowed(&mut self, allowed: Vec<Method>) {
        self.allowed = allowed;
    }

    /// Resets every mutable field for a fresh request. The enumerated
    /// contract is documented on [`crate::pool::ContextPool`].
    pub(crate) fn reset(&mut self, method: Method, path: &str) {
        self.method = method;
        self.path.clear();
        self.path.push_str(path);
        self.params.clear();
        self.chain = HandlerChain::default();
        self.cursor = 0;
        self.allowed.clear();
        self.response.clear();
    }

    pub(crate) fn take_response(&mut self) -> Response {
        std::mem::take(&mut self.response)
    }
}
