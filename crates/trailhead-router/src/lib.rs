//! Compressed prefix tree for HTTP path routing.
//!
//! This crate provides the matching core of trailhead: a trie keyed by
//! literal path chunks (including their trailing slash), with at most one
//! named-parameter child and one trailing-wildcard child per node.
//!
//! # Features
//!
//! - Single map lookup per `segment/` chunk
//! - Named parameters (`/users/:id`) extracted in walk order
//! - Trailing catch-all (`/static/*`) capturing the remainder
//! - Structural conflicts rejected at insertion, never at request time
//!
//! The tree is generic over the per-(method, node) payload, so it knows
//! nothing about handlers; the framework layer stores its flattened handler
//! chains here.

#![forbid(unsafe_code)]

mod error;
mod node;
mod params;
mod tree;

pub use error::InsertError;
pub use params::{Param, Params, WILDCARD_KEY};
pub use tree::{method_order, Lookup, PathTree, MAX_ROUTE_PARAMS};
