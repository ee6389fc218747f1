//! A trie-based HTTP request router.
//!
//! trailhead matches request paths against registered patterns with a
//! compressed prefix tree, then runs the matched middleware chain through
//! a pooled per-request context:
//!
//! - **Deterministic precedence** - static chunk, then `:param`, then the
//!   trailing `*` catch-all; conflicts are rejected at registration, not
//!   discovered per request
//! - **Cheap parameters** - an ordered, reused buffer instead of a map
//! - **Cooperative middleware** - each handler advances the chain exactly
//!   once with [`RequestContext::next`]; not advancing short-circuits
//! - **Redirect fallback** - near-miss paths (case, trailing slash) answer
//!   with `301`/`307` instead of `404`
//!
//! # Quick Start
//!
//! ```
//! use trailhead::{Method, RequestContext, Router, StatusCode};
//!
//! fn hello(ctx: &mut RequestContext) {
//!     let name = ctx.param("name").unwrap_or("world").to_string();
//!     ctx.response_mut().write(format!("hello, {name}"));
//! }
//!
//! let mut router = Router::new();
//! router.get("/hello/:name", hello).unwrap();
//! let dispatcher = router.finalize();
//!
//! let resp = dispatcher.handle(Method::GET, "/hello/trail");
//! assert_eq!(resp.status(), StatusCode::OK);
//! assert_eq!(resp.body(), b"hello, trail");
//! ```
//!
//! # Groups and middleware
//!
//! ```
//! use trailhead::{Method, RequestContext, RouteGroup, Router, StatusCode};
//!
//! fn require_token(ctx: &mut RequestContext) {
//!     if ctx.param("token").is_some() {
//!         ctx.next();
//!     } else {
//!         ctx.response_mut().set_status(StatusCode::UNAUTHORIZED);
//!     }
//! }
//!
//! let admin = RouteGroup::new("/admin")
//!     .middleware(require_token)
//!     .get("/:token/panel", |ctx: &mut RequestContext| {
//!         ctx.response_mut().write("panel");
//!     });
//!
//! let mut router = Router::new();
//! router.include(admin).unwrap();
//! let dispatcher = router.finalize();
//!
//! let ok = dispatcher.handle(Method::GET, "/admin/s3cr3t/panel");
//! assert_eq!(ok.body(), b"panel");
//! ```
//!
//! # Crate Structure
//!
//! - [`trailhead_core`] - registrar, dispatcher, groups, contexts, pool
//! - [`trailhead_router`] - the path tree and parameter types

#![forbid(unsafe_code)]

// Re-export crates
pub use trailhead_core as core;
pub use trailhead_router as router;

// Re-export commonly used types
pub use trailhead_core::{
    format_allow_header, ArcHandler, ContextPool, Dispatch, Dispatcher, Handler, HandlerChain,
    Method, PooledContext, RequestContext, Response, RouteError, RouteGroup, RouteRecord, Router,
    RouterConfig, StatusCode,
};

// Re-export the matching core
pub use trailhead_router::{
    method_order, InsertError, Lookup, Param, Params, PathTree, MAX_ROUTE_PARAMS, WILDCARD_KEY,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Dispatch, Dispatcher, Handler, HandlerChain, InsertError, Method, Param, Params,
        RequestContext, Response, RouteError, RouteGroup, Router, RouterConfig, StatusCode,
    };
}
