//! Registration and dispatch.
//!
//! The router has a two-phase lifecycle. The build phase is a mutable
//! [`Router`]: routes, groups, global middleware and configuration go in,
//! and every structural conflict surfaces synchronously as a
//! [`RouteError`]. [`Router::finalize`] then consumes the registrar and
//! returns an immutable [`Dispatcher`]; from that point the tree is
//! read-only and safely shared by any number of concurrent requests.
//!
//! Dispatch never produces an error value. Every request resolves to some
//! handler chain: the matched route, a synthesized redirect, the
//! method-not-allowed chain, or the not-found chain.

use std::sync::Arc;

use http::{header, HeaderValue, Method, StatusCode};
use thiserror::Error;
use tracing::{debug, trace};

use trailhead_router::{InsertError, Lookup, Params, PathTree};

use crate::config::RouterConfig;
use crate::context::RequestContext;
use crate::group::{FlatRoute, RouteGroup};
use crate::handler::{ArcHandler, Handler, HandlerChain};
use crate::pool::ContextPool;
use crate::response::Response;

/// An error raised by the registration API.
///
/// These are programmer errors in route configuration: fail fast, loud,
/// at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A structural conflict in the path tree.
    #[error(transparent)]
    Insert(#[from] InsertError),

    /// A registration without a terminal handler.
    #[error("no handler mapped to path {pattern:?}")]
    NoHandler {
        /// The pattern that was registered without handlers.
        pattern: String,
    },
}

/// One registered route, for introspection and startup listings.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    /// The HTTP method.
    pub method: Method,
    /// The full pattern as inserted into the tree.
    pub pattern: String,
}

/// Formats an allowed-method set as an `Allow` header value.
#[must_use]
pub fn format_allow_header(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn default_not_found(ctx: &mut RequestContext) {
    let resp = ctx.response_mut();
    resp.set_status(StatusCode::NOT_FOUND);
    resp.set_body("404 page not found");
}

fn default_method_not_allowed(ctx: &mut RequestContext) {
    let allow = format_allow_header(ctx.allowed_methods());
    let resp = ctx.response_mut();
    if let Ok(value) = HeaderValue::from_str(&allow) {
        resp.headers_mut().insert(header::ALLOW, value);
    }
    resp.set_status(StatusCode::METHOD_NOT_ALLOWED);
    resp.set_body("405 method not allowed");
}

/// The build-phase registrar.
///
/// Global middleware is snapshotted into each route's chain at
/// registration, so middleware must be added before the routes it should
/// wrap. The not-found and not-allowed chains are assembled at
/// [`Router::finalize`] from the final global list.
pub struct Router {
    config: RouterConfig,
    tree: PathTree<HandlerChain>,
    middleware: Vec<ArcHandler>,
    routes: Vec<RouteRecord>,
    max_params: usize,
    not_found: ArcHandler,
    method_not_allowed: ArcHandler,
}

impl Router {
    /// Creates a registrar with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Creates a registrar with the given configuration.
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            tree: PathTree::new(),
            middleware: Vec::new(),
            routes: Vec::new(),
            max_params: 0,
            not_found: Arc::new(default_not_found),
            method_not_allowed: Arc::new(default_method_not_allowed),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Appends a global middleware handler.
    ///
    /// Applies to every route registered afterwards and to the not-found
    /// and not-allowed chains.
    pub fn use_middleware<H: Handler + 'static>(&mut self, middleware: H) {
        self.middleware.push(Arc::new(middleware));
    }

    /// Appends an already-shared global middleware handler.
    pub fn use_middleware_arc(&mut self, middleware: ArcHandler) {
        self.middleware.push(middleware);
    }

    /// Replaces the terminal not-found handler.
    pub fn set_not_found<H: Handler + 'static>(&mut self, handler: H) {
        self.not_found = Arc::new(handler);
    }

    /// Replaces the terminal method-not-allowed handler.
    ///
    /// The handler reads the allowed set from
    /// [`RequestContext::allowed_methods`].
    pub fn set_method_not_allowed<H: Handler + 'static>(&mut self, handler: H) {
        self.method_not_allowed = Arc::new(handler);
    }

    /// Registers `handler` for `(method, pattern)`.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for any structural conflict; see
    /// [`InsertError`].
    pub fn handle<H: Handler + 'static>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.register(method, pattern, Vec::new(), vec![Arc::new(handler)])
    }

    /// Registers a route with per-route middleware ahead of the terminal
    /// handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for any structural conflict.
    pub fn handle_with<H: Handler + 'static>(
        &mut self,
        method: Method,
        pattern: &str,
        middleware: Vec<ArcHandler>,
        handler: H,
    ) -> Result<(), RouteError> {
        self.register(method, pattern, middleware, vec![Arc::new(handler)])
    }

    /// Registers a raw handler sequence: every entry but the last is
    /// per-route middleware, the last is the terminal handler.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoHandler`] for an empty sequence, or any
    /// structural conflict.
    pub fn handle_chain(
        &mut self,
        method: Method,
        pattern: &str,
        handlers: Vec<ArcHandler>,
    ) -> Result<(), RouteError> {
        self.register(method, pattern, Vec::new(), handlers)
    }

    /// Registers a GET route.
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn get<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.handle(Method::GET, pattern, handler)
    }

    /// Registers a POST route.
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn post<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.handle(Method::POST, pattern, handler)
    }

    /// Registers a PUT route.
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn put<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.handle(Method::PUT, pattern, handler)
    }

    /// Registers a DELETE route.
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn delete<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.handle(Method::DELETE, pattern, handler)
    }

    /// Registers a PATCH route.
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn patch<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.handle(Method::PATCH, pattern, handler)
    }

    /// Registers a HEAD route.
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn head<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.handle(Method::HEAD, pattern, handler)
    }

    /// Registers an OPTIONS route.
    ///
    /// # Errors
    ///
    /// See [`Router::handle`].
    pub fn options<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.handle(Method::OPTIONS, pattern, handler)
    }

    /// Mounts a [`RouteGroup`], flattening its prefix tree and middleware
    /// into ordinary registrations.
    ///
    /// Top-level groups inherit the router's current global middleware
    /// position, like directly-registered routes do.
    ///
    /// # Errors
    ///
    /// Returns the first [`RouteError`] among the group's routes. Routes
    /// flattened before the failing one stay registered, consistent with
    /// the fail-fast contract: a registration error aborts startup.
    pub fn include(&mut self, group: RouteGroup) -> Result<(), RouteError> {
        let flats: Vec<FlatRoute> = group.flatten("", &[]);
        for flat in flats {
            self.register(flat.method, &flat.pattern, flat.middleware, flat.handlers)?;
        }
        Ok(())
    }

    /// The registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// Ends the build phase, returning the immutable dispatcher.
    #[must_use]
    pub fn finalize(self) -> Dispatcher {
        let not_found = terminal_chain(&self.middleware, self.not_found);
        let not_allowed = terminal_chain(&self.middleware, self.method_not_allowed);
        debug!(routes = self.routes.len(), "router finalized");
        Dispatcher {
            tree: self.tree,
            config: self.config,
            routes: self.routes,
            not_found,
            not_allowed,
            pool: ContextPool::new(self.max_params),
        }
    }

    fn register(
        &mut self,
        method: Method,
        pattern: &str,
        middleware: Vec<ArcHandler>,
        handlers: Vec<ArcHandler>,
    ) -> Result<(), RouteError> {
        if handlers.is_empty() {
            return Err(RouteError::NoHandler {
                pattern: pattern.to_string(),
            });
        }
        let mut chain =
            Vec::with_capacity(self.middleware.len() + middleware.len() + handlers.len());
        chain.extend(self.middleware.iter().cloned());
        chain.extend(middleware);
        chain.extend(handlers);

        let param_count =
            self.tree
                .insert(method.clone(), pattern, HandlerChain::new(chain))?;
        self.max_params = self.max_params.max(param_count);
        debug!(method = %method, pattern, "route registered");
        self.routes.push(RouteRecord { method, pattern: pattern.to_string() });
        Ok(())
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn terminal_chain(middleware: &[ArcHandler], terminal: ArcHandler) -> HandlerChain {
    let mut chain = Vec::with_capacity(middleware.len() + 1);
    chain.extend(middleware.iter().cloned());
    chain.push(terminal);
    HandlerChain::new(chain)
}

/// The policy outcome for one request, before any handler runs.
///
/// Useful on its own for testing route tables; [`Dispatcher::handle`]
/// turns it into a response.
#[derive(Debug)]
pub enum Dispatch<'d> {
    /// A route matched; the caller's `Params` hold the extracted values.
    Match {
        /// The matched handler chain.
        chain: &'d HandlerChain,
    },
    /// A retry against a corrected path matched; answer with a redirect
    /// instead of invoking the route.
    Redirect {
        /// The corrected path.
        location: String,
        /// `301` for GET and HEAD, `307` otherwise.
        status: StatusCode,
    },
    /// The node is registered for other methods only.
    MethodNotAllowed {
        /// The allowed set, in canonical order.
        allowed: Vec<Method>,
    },
    /// Nothing matched; the not-found chain answers.
    NotFound,
}

/// The immutable serve-phase router.
///
/// Cheaply shared by reference across request threads: the tree is
/// read-only and the context pool is internally synchronized.
pub struct Dispatcher {
    tree: PathTree<HandlerChain>,
    config: RouterConfig,
    routes: Vec<RouteRecord>,
    not_found: HandlerChain,
    not_allowed: HandlerChain,
    pool: ContextPool,
}

impl Dispatcher {
    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// The context pool backing [`Dispatcher::handle`].
    #[must_use]
    pub fn pool(&self) -> &ContextPool {
        &self.pool
    }

    /// Resolves the policy outcome for `(method, path)`.
    ///
    /// `params` is filled only for [`Dispatch::Match`] and left empty
    /// otherwise. The empty path is treated as `/`.
    pub fn dispatch<'d>(
        &'d self,
        method: &Method,
        path: &str,
        params: &mut Params,
    ) -> Dispatch<'d> {
        let path = if path.is_empty() { "/" } else { path };
        match self.tree.lookup(method, path, params) {
            Lookup::Found(chain) => Dispatch::Match { chain },
            Lookup::MethodMismatch(allowed) if self.config.handle_method_not_allowed => {
                Dispatch::MethodNotAllowed { allowed }
            }
            Lookup::MethodMismatch(_) | Lookup::NotFound => {
                if self.config.redirect_trailing_slash {
                    self.try_redirect(method, path, params)
                } else {
                    Dispatch::NotFound
                }
            }
        }
    }

    /// Runs the full request path: pooled context checkout, policy
    /// resolution, chain execution, response.
    pub fn handle(&self, method: Method, path: &str) -> Response {
        let path = if path.is_empty() { "/" } else { path };
        let mut ctx = self.pool.checkout(method.clone(), path);
        let outcome;
        match self.dispatch(&method, path, ctx.params_mut()) {
            Dispatch::Match { chain } => {
                outcome = "match";
                let chain = chain.clone();
                ctx.set_chain(chain);
            }
            Dispatch::Redirect { location, status } => {
                outcome = "redirect";
                let redirect: ArcHandler = Arc::new(move |ctx: &mut RequestContext| {
                    let resp = ctx.response_mut();
                    resp.set_status(status);
                    if let Ok(value) = HeaderValue::from_str(&location) {
                        resp.headers_mut().insert(header::LOCATION, value);
                    }
                });
                ctx.set_chain(HandlerChain::new(vec![redirect]));
            }
            Dispatch::MethodNotAllowed { allowed } => {
                outcome = "method_not_allowed";
                ctx.set_allowed(allowed);
                ctx.set_chain(self.not_allowed.clone());
            }
            Dispatch::NotFound => {
                outcome = "not_found";
                ctx.set_chain(self.not_found.clone());
            }
        }
        ctx.run();
        trace!(method = %method, path, outcome, "request dispatched");
        ctx.take_response()
    }

    /// Not-found fallback: two fresh top-down retries, first against the
    /// case-lowered path, then against the trailing-slash toggle. A retry
    /// must fully match the method to count.
    fn try_redirect<'d>(
        &'d self,
        method: &Method,
        path: &str,
        params: &mut Params,
    ) -> Dispatch<'d> {
        let lowered = path.to_ascii_lowercase();
        if lowered != path && self.tree.lookup(method, &lowered, params).is_found() {
            params.clear();
            return Dispatch::Redirect {
                location: lowered,
                status: redirect_status(method),
            };
        }
        if let Some(toggled) = toggle_trailing_slash(path) {
            if self.tree.lookup(method, &toggled, params).is_found() {
                params.clear();
                return Dispatch::Redirect {
                    location: toggled,
                    status: redirect_status(method),
                };
            }
        }
        params.clear();
        Dispatch::NotFound
    }
}

fn redirect_status(method: &Method) -> StatusCode {
    if *method == Method::GET || *method == Method::HEAD {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::TEMPORARY_REDIRECT
    }
}

/// Toggles the presence of a trailing slash. `/` has no toggle: removing
/// its slash would leave the empty path, which is `/` again.
fn toggle_trailing_slash(path: &str) -> Option<String> {
    if path == "/" {
        return None;
    }
    if let Some(stripped) = path.strip_suffix('/') {
        Some(stripped.to_string())
    } else {
        Some(format!("{path}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn body_handler(body: &'static str) -> impl Handler {
        move |ctx: &mut RequestContext| {
            ctx.response_mut().write(body);
        }
    }

    fn recording(label: &'static str, seen: &Arc<Mutex<Vec<&'static str>>>) -> ArcHandler {
        let seen = Arc::clone(seen);
        Arc::new(move |ctx: &mut RequestContext| {
            seen.lock().push(label);
            ctx.next();
        })
    }

    // ========================================================================
    // Registration
    // ========================================================================

    #[test]
    fn rejects_registration_without_handlers() {
        let mut router = Router::new();
        let err = router
            .handle_chain(Method::GET, "/orphan", Vec::new())
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::NoHandler {
                pattern: "/orphan".to_string()
            }
        );
        assert_eq!(err.to_string(), "no handler mapped to path \"/orphan\"");
    }

    #[test]
    fn tree_conflicts_surface_through_route_error() {
        let mut router = Router::new();
        router.get("/home", body_handler("a")).unwrap();
        let err = router.get("/home", body_handler("b")).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Insert(InsertError::DuplicateRoute { .. })
        ));
    }

    #[test]
    fn routes_lists_registrations_in_order() {
        let mut router = Router::new();
        router.get("/a", body_handler("a")).unwrap();
        router.post("/b", body_handler("b")).unwrap();

        let patterns: Vec<_> = router
            .routes()
            .iter()
            .map(|r| (r.method.clone(), r.pattern.as_str()))
            .collect();
        assert_eq!(
            patterns,
            vec![(Method::GET, "/a"), (Method::POST, "/b")]
        );
    }

    #[test]
    fn format_allow_header_joins_methods() {
        assert_eq!(
            format_allow_header(&[Method::GET, Method::HEAD, Method::POST]),
            "GET, HEAD, POST"
        );
        assert_eq!(format_allow_header(&[]), "");
    }

    // ========================================================================
    // Matching and chain order
    // ========================================================================

    #[test]
    fn matched_route_returns_handler_body_and_params() {
        let mut router = Router::new();
        router
            .get("/users/:id", |ctx: &mut RequestContext| {
                let id = ctx.param("id").unwrap_or("?").to_string();
                ctx.response_mut().write(id);
            })
            .unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::GET, "/users/42");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), b"42");
    }

    #[test]
    fn global_middleware_runs_before_route_handler() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = Router::new();
        router.use_middleware_arc(recording("global", &seen));
        let route_seen = Arc::clone(&seen);
        router
            .get("/x", move |_ctx: &mut RequestContext| {
                route_seen.lock().push("route");
            })
            .unwrap();
        let dispatcher = router.finalize();

        dispatcher.handle(Method::GET, "/x");
        assert_eq!(*seen.lock(), ["global", "route"]);
    }

    #[test]
    fn middleware_is_snapshotted_at_registration() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = Router::new();
        let early_seen = Arc::clone(&seen);
        router
            .get("/early", move |_ctx: &mut RequestContext| {
                early_seen.lock().push("early");
            })
            .unwrap();
        router.use_middleware_arc(recording("late-mw", &seen));
        let late_seen = Arc::clone(&seen);
        router
            .get("/late", move |_ctx: &mut RequestContext| {
                late_seen.lock().push("late");
            })
            .unwrap();
        let dispatcher = router.finalize();

        dispatcher.handle(Method::GET, "/early");
        assert_eq!(*seen.lock(), ["early"], "earlier route bypasses later middleware");
        seen.lock().clear();
        dispatcher.handle(Method::GET, "/late");
        assert_eq!(*seen.lock(), ["late-mw", "late"]);
    }

    #[test]
    fn per_route_middleware_sits_between_global_and_terminal() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = Router::new();
        router.use_middleware_arc(recording("global", &seen));
        let terminal_seen = Arc::clone(&seen);
        router
            .handle_with(
                Method::GET,
                "/x",
                vec![recording("route-mw", &seen)],
                move |_ctx: &mut RequestContext| {
                    terminal_seen.lock().push("terminal");
                },
            )
            .unwrap();
        let dispatcher = router.finalize();

        dispatcher.handle(Method::GET, "/x");
        assert_eq!(*seen.lock(), ["global", "route-mw", "terminal"]);
    }

    // ========================================================================
    // Not-found, redirects, 405
    // ========================================================================

    #[test]
    fn unmatched_path_gets_the_default_not_found() {
        let router = Router::new();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::GET, "/nowhere");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.body(), b"404 page not found");
    }

    #[test]
    fn not_found_chain_runs_global_middleware_then_custom_terminal() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = Router::new();
        router.use_middleware_arc(recording("global", &seen));
        let custom_seen = Arc::clone(&seen);
        router.set_not_found(move |ctx: &mut RequestContext| {
            custom_seen.lock().push("custom-404");
            ctx.response_mut().set_status(StatusCode::NOT_FOUND);
            ctx.response_mut().write("gone");
        });
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::GET, "/nowhere");
        assert_eq!(*seen.lock(), ["global", "custom-404"]);
        assert_eq!(resp.body(), b"gone");
    }

    #[test]
    fn trailing_slash_toggle_redirects_with_301_for_get() {
        let mut router = Router::new();
        router.get("/users/", body_handler("list")).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::GET, "/users");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            resp.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(&b"/users/"[..])
        );
    }

    #[test]
    fn trailing_slash_toggle_redirects_with_307_for_post() {
        let mut router = Router::new();
        router.post("/submit", body_handler("ok")).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::POST, "/submit/");
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(&b"/submit"[..])
        );
    }

    #[test]
    fn case_lowered_retry_redirects_before_slash_toggle() {
        let mut router = Router::new();
        router.get("/about", body_handler("about")).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::GET, "/About");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            resp.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(&b"/about"[..])
        );
    }

    #[test]
    fn redirects_are_disabled_by_configuration() {
        let mut router =
            Router::with_config(RouterConfig::new().redirect_trailing_slash(false));
        router.get("/users/", body_handler("list")).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::GET, "/users");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn retry_requires_a_full_method_match() {
        // Only GET is registered: a POST near-miss must 404, not redirect
        // onto a path that would then be method-mismatched.
        let mut router = Router::new();
        router.get("/users", body_handler("list")).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::POST, "/users/");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn method_not_allowed_reports_the_allowed_set() {
        let mut router =
            Router::with_config(RouterConfig::new().handle_method_not_allowed(true));
        router.get("/resource", body_handler("get")).unwrap();
        router.post("/resource", body_handler("post")).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::DELETE, "/resource");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            resp.headers().get(header::ALLOW).map(|v| v.as_bytes()),
            Some(&b"GET, POST"[..])
        );
    }

    #[test]
    fn method_not_allowed_is_off_by_default() {
        let mut router = Router::new();
        router.get("/resource", body_handler("get")).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::DELETE, "/resource");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn empty_path_is_dispatched_as_root() {
        let mut router = Router::new();
        router.get("/", body_handler("root")).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::GET, "");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), b"root");
    }

    #[test]
    fn dispatch_exposes_the_policy_outcome() {
        let mut router = Router::new();
        router.get("/users/:id", body_handler("u")).unwrap();
        let dispatcher = router.finalize();

        let mut params = Params::new();
        match dispatcher.dispatch(&Method::GET, "/users/7", &mut params) {
            Dispatch::Match { chain } => assert_eq!(chain.len(), 1),
            other => panic!("expected Match, got {other:?}"),
        }
        assert_eq!(params.get("id"), Some("7"));

        match dispatcher.dispatch(&Method::GET, "/users/7/", &mut params) {
            Dispatch::Redirect { location, status } => {
                assert_eq!(location, "/users/7");
                assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
            }
            other => panic!("expected Redirect, got {other:?}"),
        }
        assert!(params.is_empty(), "params are only valid for Match");
    }

    #[test]
    fn handle_recycles_contexts_through_the_pool() {
        let mut router = Router::new();
        router.get("/x", body_handler("x")).unwrap();
        let dispatcher = router.finalize();

        assert_eq!(dispatcher.pool().idle(), 0);
        dispatcher.handle(Method::GET, "/x");
        assert_eq!(dispatcher.pool().idle(), 1);
        dispatcher.handle(Method::GET, "/x");
        assert_eq!(dispatcher.pool().idle(), 1, "one context is reused");
    }

    #[test]
    fn groups_mount_with_prefix_and_middleware() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut router = Router::new();
        let leaf_seen = Arc::clone(&seen);
        let api = RouteGroup::new("/api")
            .middleware({
                let seen = Arc::clone(&seen);
                move |ctx: &mut RequestContext| {
                    seen.lock().push("group-mw");
                    ctx.next();
                }
            })
            .get("/ping", move |ctx: &mut RequestContext| {
                leaf_seen.lock().push("ping");
                ctx.response_mut().write("pong");
            });
        router.include(api).unwrap();
        let dispatcher = router.finalize();

        let resp = dispatcher.handle(Method::GET, "/api/ping");
        assert_eq!(resp.body(), b"pong");
        assert_eq!(*seen.lock(), ["group-mw", "ping"]);
    }

    #[test]
    fn group_conflicts_surface_at_include() {
        let mut router = Router::new();
        router.get("/api/users/:id", body_handler("a")).unwrap();
        let group = RouteGroup::new("/api").get("/users/:name", body_handler("b"));
        let err = router.include(group).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Insert(InsertError::ParamNameMismatch { .. })
        ));
    }
}
