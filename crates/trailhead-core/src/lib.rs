//! Core types for trailhead.
//!
//! This crate provides the framework layer over the path tree in
//! [`trailhead_router`]:
//!
//! - [`Router`] / [`Dispatcher`] - two-phase registrar and immutable
//!   matcher
//! - [`RouteGroup`] - prefix + middleware composition at registration
//! - [`Handler`] / [`HandlerChain`] - the normalized handler capability
//! - [`RequestContext`] / [`ContextPool`] - pooled per-request state with
//!   the cursored chain-execution engine
//!
//! # Design Principles
//!
//! - Registration fails fast and loud; dispatch never returns an error
//! - The tree is built single-threaded, then read-only while serving
//! - One allocation-shy context per in-flight request, recycled through
//!   the pool

#![forbid(unsafe_code)]
// Pedantic clippy lints allowed (style suggestions, not correctness issues)
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
mod context;
pub mod group;
mod handler;
pub mod pool;
mod response;
pub mod router;

pub use config::RouterConfig;
pub use context::RequestContext;
pub use group::RouteGroup;
pub use handler::{ArcHandler, Handler, HandlerChain};
pub use pool::{ContextPool, PooledContext};
pub use response::Response;
pub use router::{format_allow_header, Dispatch, Dispatcher, RouteError, RouteRecord, Router};

// Re-export the matching core for consumers that want the raw tree.
pub use trailhead_router::{
    method_order, InsertError, Lookup, Param, Params, PathTree, MAX_ROUTE_PARAMS, WILDCARD_KEY,
};

// Re-export the HTTP vocabulary used across the API.
pub use http::{Method, StatusCode};
