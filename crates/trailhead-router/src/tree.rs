//! The path tree: insertion and lookup.
//!
//! Patterns and request paths share one tokenization: everything after the
//! leading `/` is consumed chunk by chunk, where a literal chunk runs up to
//! and including the next `/` (or to the end of the path). The chunk that
//! follows a parameter therefore begins with the separator and the bare
//! `"/"` chunk is a legal key; this is what keeps `/users/:id` and
//! `/users/:id/` distinct nodes without special cases.
//!
//! Matching walks an explicit state ladder per chunk: static child first,
//! then the parameter child, then the catch-all child, otherwise the walk
//! fails. There is no backtracking; conflicts that would require it are
//! rejected at insertion instead.

use std::collections::HashSet;
use std::sync::Arc;

use http::Method;

use crate::error::InsertError;
use crate::node::{Node, ParamChild, WildcardChild};
use crate::params::{Params, WILDCARD_KEY};

/// Maximum number of parameters (including a catch-all) in one route.
///
/// Request parameter buffers are sized once at finalization, so the
/// per-route count is bounded here and enforced at registration.
pub const MAX_ROUTE_PARAMS: usize = 255;

/// Canonical ordering for HTTP methods in allowed-method enumerations.
///
/// GET, HEAD, POST, PUT, DELETE, PATCH, OPTIONS, TRACE; extension methods
/// sort last.
#[must_use]
pub fn method_order(method: &Method) -> u8 {
    match method.as_str() {
        "GET" => 0,
        "HEAD" => 1,
        "POST" => 2,
        "PUT" => 3,
        "DELETE" => 4,
        "PATCH" => 5,
        "OPTIONS" => 6,
        "TRACE" => 7,
        _ => 8,
    }
}

/// Result of a tree lookup.
#[derive(Debug)]
pub enum Lookup<'t, T> {
    /// A route terminates here for the requested method; `params` holds
    /// the extracted parameters.
    Found(&'t T),
    /// The path reached a node with routes for other methods only. The
    /// vector is the allowed set in canonical order.
    MethodMismatch(Vec<Method>),
    /// The walk failed or the final node carries no routes.
    NotFound,
}

impl<T> Lookup<'_, T> {
    /// Returns `true` for [`Lookup::Found`].
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A parsed pattern token. Produced by the tokenizer shared between
/// insertion and (conceptually) lookup; lookup never materializes tokens,
/// it applies the same boundary rules to the request path in place.
enum PatternToken<'p> {
    /// Literal chunk, trailing slash included when one follows.
    Chunk(&'p str),
    /// `:name` parameter.
    Param(&'p str),
    /// Trailing `*`.
    CatchAll,
}

/// Walk states for one chunk of the lookup loop.
enum WalkState {
    MatchingStatic,
    TryParam,
    TryWildcard,
    Fallback,
}

/// The compressed prefix tree.
///
/// Generic over the per-(method, node) payload `T`; the framework layer
/// stores flattened handler chains, tests store markers.
pub struct PathTree<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> PathTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            route_count: 0,
        }
    }

    /// Number of registered (method, pattern) routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.route_count
    }

    /// Returns `true` if no route has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Inserts `value` for `(method, pattern)`.
    ///
    /// Returns the pattern's parameter count (catch-all included) so the
    /// caller can track the running maximum for buffer sizing.
    ///
    /// # Errors
    ///
    /// Any structural conflict is rejected immediately; see
    /// [`InsertError`]. A failed insertion may leave empty intermediate
    /// nodes behind, which are unreachable by lookup and harmless.
    pub fn insert(
        &mut self,
        method: Method,
        pattern: &str,
        value: T,
    ) -> Result<usize, InsertError> {
        let tokens = tokenize(pattern)?;
        let param_count = tokens
            .iter()
            .filter(|t| matches!(t, PatternToken::Param(_) | PatternToken::CatchAll))
            .count();

        let mut node = &mut self.root;
        for token in &tokens {
            match token {
                PatternToken::Chunk(chunk) => {
                    node = node
                        .static_children
                        .entry(Box::from(*chunk))
                        .or_insert_with(Node::new);
                }
                PatternToken::Param(name) => {
                    if let Some(wc) = &node.wildcard_child {
                        if wc.methods.contains(&method) {
                            return Err(InsertError::ParamCatchAllConflict {
                                pattern: pattern.to_string(),
                                param: (*name).to_string(),
                                method,
                            });
                        }
                    }
                    match &node.param_child {
                        Some(pc) if pc.name.as_ref() != *name => {
                            return Err(InsertError::ParamNameMismatch {
                                pattern: pattern.to_string(),
                                existing: pc.name.to_string(),
                                name: (*name).to_string(),
                            });
                        }
                        Some(_) => {}
                        None => {
                            node.param_child = Some(ParamChild {
                                name: Arc::from(*name),
                                methods: HashSet::new(),
                                node: Box::new(Node::new()),
                            });
                        }
                    }
                    let pc = node.param_child.as_mut().unwrap();
                    pc.methods.insert(method.clone());
                    node = &mut pc.node;
                }
                PatternToken::CatchAll => {
                    if let Some(pc) = &node.param_child {
                        if pc.methods.contains(&method) {
                            return Err(InsertError::CatchAllParamConflict {
                                pattern: pattern.to_string(),
                                param: pc.name.to_string(),
                                method,
                            });
                        }
                    }
                    if node.wildcard_child.is_none() {
                        node.wildcard_child = Some(WildcardChild {
                            key: Arc::from(WILDCARD_KEY),
                            methods: HashSet::new(),
                            node: Box::new(Node::new()),
                        });
                    }
                    let wc = node.wildcard_child.as_mut().unwrap();
                    wc.methods.insert(method.clone());
                    node = &mut wc.node;
                }
            }
        }

        if node.endpoints.contains_key(&method) {
            return Err(InsertError::DuplicateRoute {
                method,
                pattern: pattern.to_string(),
            });
        }
        node.endpoints.insert(method, value);
        self.route_count += 1;
        Ok(param_count)
    }

    /// Walks the tree for `path`, filling `params` with extracted values
    /// in first-encountered order.
    ///
    /// `params` is cleared on entry and left empty on any outcome other
    /// than [`Lookup::Found`]. The empty path is the root, as is `/`.
    pub fn lookup<'t>(
        &'t self,
        method: &Method,
        path: &str,
        params: &mut Params,
    ) -> Lookup<'t, T> {
        params.clear();
        let mut rest = if path.is_empty() {
            ""
        } else if let Some(rest) = path.strip_prefix('/') {
            rest
        } else {
            return Lookup::NotFound;
        };

        let mut node = &self.root;
        'walk: while !rest.is_empty() {
            let mut state = WalkState::MatchingStatic;
            loop {
                match state {
                    WalkState::MatchingStatic => {
                        let chunk = match rest.find('/') {
                            Some(i) => &rest[..=i],
                            None => rest,
                        };
                        if let Some(child) = node.static_children.get(chunk) {
                            node = child;
                            rest = &rest[chunk.len()..];
                            continue 'walk;
                        }
                        state = WalkState::TryParam;
                    }
                    WalkState::TryParam => {
                        if let Some(pc) = &node.param_child {
                            let end = rest.find('/').unwrap_or(rest.len());
                            if end > 0 {
                                params.push(Arc::clone(&pc.name), rest[..end].to_string());
                                node = &pc.node;
                                rest = &rest[end..];
                                continue 'walk;
                            }
                        }
                        state = WalkState::TryWildcard;
                    }
                    WalkState::TryWildcard => {
                        if let Some(wc) = &node.wildcard_child {
                            params.push(Arc::clone(&wc.key), rest.to_string());
                            node = &wc.node;
                            rest = "";
                            continue 'walk;
                        }
                        state = WalkState::Fallback;
                    }
                    WalkState::Fallback => {
                        params.clear();
                        return Lookup::NotFound;
                    }
                }
            }
        }

        // A path that stops exactly where a catch-all begins matches it
        // with an empty capture, unless a route terminates at the node
        // itself.
        let node = if node.endpoints.is_empty() {
            match &node.wildcard_child {
                Some(wc) if !wc.node.endpoints.is_empty() => {
                    params.push(Arc::clone(&wc.key), String::new());
                    &*wc.node
                }
                _ => node,
            }
        } else {
            node
        };

        if let Some(value) = node.endpoints.get(method) {
            return Lookup::Found(value);
        }
        params.clear();
        if node.endpoints.is_empty() {
            return Lookup::NotFound;
        }
        let mut allowed: Vec<Method> = node.endpoints.keys().cloned().collect();
        allowed.sort_by(|a, b| {
            method_order(a)
                .cmp(&method_order(b))
                .then_with(|| a.as_str().cmp(b.as_str()))
        });
        Lookup::MethodMismatch(allowed)
    }
}

impl<T> Default for PathTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn tokenize(pattern: &str) -> Result<Vec<PatternToken<'_>>, InsertError> {
    let Some(rest) = pattern.strip_prefix('/') else {
        return Err(InsertError::MissingLeadingSlash {
            pattern: pattern.to_string(),
        });
    };
    if let Some(i) = pattern.find("//") {
        return Err(InsertError::EmptySegment {
            pattern: pattern.to_string(),
            index: i + 1,
        });
    }

    let bytes = rest.as_bytes();
    let mut tokens = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        match bytes[pos] {
            b':' => {
                let end = rest[pos + 1..]
                    .find('/')
                    .map_or(rest.len(), |i| pos + 1 + i);
                let name = &rest[pos + 1..end];
                if name.is_empty() {
                    return Err(InsertError::EmptyParamName {
                        pattern: pattern.to_string(),
                        // byte offset of the ':' within the full pattern
                        index: pos + 1,
                    });
                }
                if let Some(found) = name.chars().find(|c| *c == ':' || *c == '*') {
                    return Err(InsertError::InvalidParamName {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                        found,
                    });
                }
                if names.contains(&name) {
                    return Err(InsertError::DuplicateParamName {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                names.push(name);
                tokens.push(PatternToken::Param(name));
                pos = end;
            }
            b'*' => {
                if pos + 1 != bytes.len() {
                    return Err(InsertError::InvalidCatchAll {
                        pattern: pattern.to_string(),
                    });
                }
                tokens.push(PatternToken::CatchAll);
                pos += 1;
            }
            _ => {
                let end = rest[pos..].find('/').map_or(rest.len(), |i| pos + i + 1);
                let chunk = &rest[pos..end];
                if let Some(found) = chunk.chars().find(|c| *c == ':' || *c == '*') {
                    return Err(InsertError::UnexpectedSpecifier {
                        pattern: pattern.to_string(),
                        segment: chunk.trim_end_matches('/').to_string(),
                        found,
                    });
                }
                tokens.push(PatternToken::Chunk(chunk));
                pos = end;
            }
        }
    }

    let param_count = tokens
        .iter()
        .filter(|t| matches!(t, PatternToken::Param(_) | PatternToken::CatchAll))
        .count();
    if param_count > MAX_ROUTE_PARAMS {
        return Err(InsertError::TooManyParams {
            pattern: pattern.to_string(),
            count: param_count,
            limit: MAX_ROUTE_PARAMS,
        });
    }

    Ok(tokens)
}
