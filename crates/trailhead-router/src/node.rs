//! Tree nodes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use http::Method;

/// One segment boundary in the route space.
///
/// Static children are keyed by the literal chunk *including* its trailing
/// slash ("users/", "posts", and the bare separator "/" that follows a
/// parameter), so one map lookup consumes a whole chunk. Dynamic children
/// are single: at most one parameter child and one catch-all child per
/// node.
pub(crate) struct Node<T> {
    pub(crate) static_children: HashMap<Box<str>, Node<T>>,
    pub(crate) param_child: Option<ParamChild<T>>,
    pub(crate) wildcard_child: Option<WildcardChild<T>>,
    /// Per-method payloads for routes terminating at this node.
    pub(crate) endpoints: HashMap<Method, T>,
}

/// The single named-parameter child of a node.
pub(crate) struct ParamChild<T> {
    /// Parameter name, shared into extracted `Params` without reallocation.
    pub(crate) name: Arc<str>,
    /// Methods whose routes descend through this child. Used only for
    /// catch-all conflict checks at insertion.
    pub(crate) methods: HashSet<Method>,
    pub(crate) node: Box<Node<T>>,
}

/// The single catch-all child of a node. Always terminal.
pub(crate) struct WildcardChild<T> {
    /// The reserved capture key, interned once per child.
    pub(crate) key: Arc<str>,
    /// Methods whose routes descend through this child.
    pub(crate) methods: HashSet<Method>,
    pub(crate) node: Box<Node<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new() -> Self {
        Self {
            static_children: HashMap::new(),
            param_child: None,
            wildcard_child: None,
            endpoints: HashMap::new(),
        }
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}
