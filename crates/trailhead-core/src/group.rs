//! Route groups for modular registration.
//!
//! A [`RouteGroup`] bundles a prefix and a middleware list so related
//! routes can be declared together and mounted onto a
//! [`crate::Router`] in one call. Groups are a registration-time
//! convenience only: when a group is included, its prefix is concatenated
//! and its middleware is flattened into each route's handler chain, and
//! the group itself disappears. Nothing is recomputed per request.
//!
//! # Example
//!
//! ```
//! use trailhead_core::{RequestContext, RouteGroup, Router};
//!
//! fn list_users(ctx: &mut RequestContext) {
//!     ctx.response_mut().write("users");
//! }
//!
//! fn get_user(ctx: &mut RequestContext) {
//!     ctx.response_mut().write("one user");
//! }
//!
//! let api = RouteGroup::new("/api/v1")
//!     .get("/users", list_users)
//!     .get("/users/:id", get_user);
//!
//! let mut router = Router::new();
//! router.include(api).unwrap();
//! ```

use http::Method;

use crate::handler::{ArcHandler, Handler};
use std::sync::Arc;

/// A route recorded inside a group, path still relative to the group.
pub(crate) struct GroupRoute {
    pub(crate) method: Method,
    pub(crate) path: String,
    /// Per-route middleware followed by the terminal handler. May be
    /// empty until include-time validation rejects it.
    pub(crate) handlers: Vec<ArcHandler>,
}

/// A fully-qualified route produced by flattening a group tree.
pub(crate) struct FlatRoute {
    pub(crate) method: Method,
    pub(crate) pattern: String,
    pub(crate) middleware: Vec<ArcHandler>,
    pub(crate) handlers: Vec<ArcHandler>,
}

/// A prefix plus an ordered middleware list, with recorded routes and
/// nested child groups.
///
/// A child group inherits its parent's effective middleware unless it
/// calls [`RouteGroup::detach_middleware`], in which case only its own
/// list applies.
pub struct RouteGroup {
    prefix: String,
    middleware: Vec<ArcHandler>,
    inherit_middleware: bool,
    routes: Vec<GroupRoute>,
    children: Vec<RouteGroup>,
}

impl RouteGroup {
    /// Creates a group with the given prefix.
    ///
    /// The prefix is normalized to begin with `/` and lose any trailing
    /// slash, so `"api"`, `"/api"` and `"/api/"` are equivalent.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut p = prefix.into();
        if !p.is_empty() && !p.starts_with('/') {
            p.insert(0, '/');
        }
        while p.ends_with('/') && p.len() > 1 {
            p.pop();
        }
        if p == "/" {
            p.clear();
        }
        Self {
            prefix: p,
            middleware: Vec::new(),
            inherit_middleware: true,
            routes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Appends a middleware handler to this group's list.
    ///
    /// Middleware runs in the order it was added, after anything
    /// inherited from the parent.
    #[must_use]
    pub fn middleware<H: Handler + 'static>(mut self, middleware: H) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Appends an already-shared middleware handler.
    ///
    /// Useful for sharing one middleware instance across groups.
    #[must_use]
    pub fn middleware_arc(mut self, middleware: ArcHandler) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Replaces inherited middleware with this group's own list.
    ///
    /// Children of this group still inherit from it as usual.
    #[must_use]
    pub fn detach_middleware(mut self) -> Self {
        self.inherit_middleware = false;
        self
    }

    /// Records a route with a single terminal handler.
    #[must_use]
    pub fn handle<H: Handler + 'static>(
        mut self,
        method: Method,
        path: impl Into<String>,
        handler: H,
    ) -> Self {
        self.routes.push(GroupRoute {
            method,
            path: path.into(),
            handlers: vec![Arc::new(handler)],
        });
        self
    }

    /// Records a route as a raw handler sequence: every entry but the
    /// last is per-route middleware, the last is the terminal handler.
    ///
    /// An empty sequence is rejected when the group is included.
    #[must_use]
    pub fn handle_chain(
        mut self,
        method: Method,
        path: impl Into<String>,
        handlers: Vec<ArcHandler>,
    ) -> Self {
        self.routes.push(GroupRoute {
            method,
            path: path.into(),
            handlers,
        });
        self
    }

    /// Records a GET route.
    #[must_use]
    pub fn get<H: Handler + 'static>(self, path: impl Into<String>, handler: H) -> Self {
        self.handle(Method::GET, path, handler)
    }

    /// Records a POST route.
    #[must_use]
    pub fn post<H: Handler + 'static>(self, path: impl Into<String>, handler: H) -> Self {
        self.handle(Method::POST, path, handler)
    }

    /// Records a PUT route.
    #[must_use]
    pub fn put<H: Handler + 'static>(self, path: impl Into<String>, handler: H) -> Self {
        self.handle(Method::PUT, path, handler)
    }

    /// Records a DELETE route.
    #[must_use]
    pub fn delete<H: Handler + 'static>(self, path: impl Into<String>, handler: H) -> Self {
        self.handle(Method::DELETE, path, handler)
    }

    /// Records a PATCH route.
    #[must_use]
    pub fn patch<H: Handler + 'static>(self, path: impl Into<String>, handler: H) -> Self {
        self.handle(Method::PATCH, path, handler)
    }

    /// Records a HEAD route.
    #[must_use]
    pub fn head<H: Handler + 'static>(self, path: impl Into<String>, handler: H) -> Self {
        self.handle(Method::HEAD, path, handler)
    }

    /// Records an OPTIONS route.
    #[must_use]
    pub fn options<H: Handler + 'static>(self, path: impl Into<String>, handler: H) -> Self {
        self.handle(Method::OPTIONS, path, handler)
    }

    /// Nests another group under this one.
    ///
    /// The child's effective prefix is this group's prefix concatenated
    /// with its own; its effective middleware is this group's effective
    /// middleware followed by its own (unless detached).
    #[must_use]
    pub fn include(mut self, child: RouteGroup) -> Self {
        self.children.push(child);
        self
    }

    /// The normalized prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Flattens this group and its children into fully-qualified routes.
    pub(crate) fn flatten(self, parent_prefix: &str, inherited: &[ArcHandler]) -> Vec<FlatRoute> {
        let prefix = combine_paths(parent_prefix, &self.prefix);
        let middleware: Vec<ArcHandler> = if self.inherit_middleware {
            inherited
                .iter()
                .chain(self.middleware.iter())
                .cloned()
                .collect()
        } else {
            self.middleware.clone()
        };

        let mut flat = Vec::new();
        for route in self.routes {
            flat.push(FlatRoute {
                method: route.method,
                pattern: combine_paths(&prefix, &route.path),
                middleware: middleware.clone(),
                handlers: route.handlers,
            });
        }
        for child in self.children {
            flat.extend(child.flatten(&prefix, &middleware));
        }
        flat
    }
}

/// Combines two path fragments, handling slashes on both sides.
pub(crate) fn combine_paths(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        }
        (false, true) => prefix.to_string(),
        (false, false) => {
            let prefix = prefix.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            if path.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix}/{path}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;

    fn noop(_ctx: &mut RequestContext) {}

    #[test]
    fn combine_paths_handles_slashes() {
        assert_eq!(combine_paths("", ""), "/");
        assert_eq!(combine_paths("", "/users"), "/users");
        assert_eq!(combine_paths("", "users"), "/users");
        assert_eq!(combine_paths("/api", ""), "/api");
        assert_eq!(combine_paths("/api", "/users"), "/api/users");
        assert_eq!(combine_paths("/api", "users"), "/api/users");
        assert_eq!(combine_paths("/api/", "/users"), "/api/users");
        assert_eq!(combine_paths("/api", "/users/"), "/api/users/");
    }

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(RouteGroup::new("api").prefix(), "/api");
        assert_eq!(RouteGroup::new("/api/").prefix(), "/api");
        assert_eq!(RouteGroup::new("/api/v1").prefix(), "/api/v1");
        assert_eq!(RouteGroup::new("/").prefix(), "");
        assert_eq!(RouteGroup::new("").prefix(), "");
    }

    #[test]
    fn flatten_applies_prefix_to_routes() {
        let group = RouteGroup::new("/api")
            .get("/users", noop)
            .post("/users", noop);

        let flat = group.flatten("", &[]);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].pattern, "/api/users");
        assert_eq!(flat[0].method, Method::GET);
        assert_eq!(flat[1].method, Method::POST);
    }

    #[test]
    fn flatten_concatenates_nested_prefixes() {
        let v1 = RouteGroup::new("/v1").get("/items", noop);
        let api = RouteGroup::new("/api").include(v1);

        let flat = api.flatten("", &[]);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].pattern, "/api/v1/items");
    }

    #[test]
    fn children_inherit_parent_middleware_in_order() {
        let child = RouteGroup::new("/child")
            .middleware(noop)
            .get("/x", noop);
        let parent = RouteGroup::new("/parent")
            .middleware(noop)
            .middleware(noop)
            .include(child);

        let flat = parent.flatten("", &[]);
        assert_eq!(flat[0].pattern, "/parent/child/x");
        // two inherited from the parent, one of its own
        assert_eq!(flat[0].middleware.len(), 3);
    }

    #[test]
    fn detached_child_replaces_inherited_middleware() {
        let child = RouteGroup::new("/child")
            .detach_middleware()
            .middleware(noop)
            .get("/x", noop);
        let parent = RouteGroup::new("/parent").middleware(noop).include(child);

        let flat = parent.flatten("", &[]);
        assert_eq!(flat[0].middleware.len(), 1);
    }

    #[test]
    fn group_level_middleware_applies_to_own_routes() {
        let group = RouteGroup::new("/admin").middleware(noop).get("/panel", noop);
        let flat = group.flatten("", &[]);
        assert_eq!(flat[0].middleware.len(), 1);
        assert_eq!(flat[0].handlers.len(), 1);
    }

    #[test]
    fn wildcard_and_parameter_paths_survive_prefixing() {
        let group = RouteGroup::new("/files")
            .get("/:bucket/meta", noop)
            .get("/raw/*", noop);
        let flat = group.flatten("", &[]);
        assert_eq!(flat[0].pattern, "/files/:bucket/meta");
        assert_eq!(flat[1].pattern, "/files/raw/*");
    }
}
