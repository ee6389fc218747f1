//! Ordered path parameters extracted during a tree walk.

use std::sync::Arc;

/// Reserved key under which a trailing catch-all capture is stored.
///
/// Parameter names may not contain `*`, so this key can never collide with
/// a user-chosen name.
pub const WILDCARD_KEY: &str = "*";

/// A single extracted path parameter.
///
/// Keys are shared with the tree (`Arc<str>`), so extracting a parameter
/// allocates only for its value.
#[derive(Debug, Clone)]
pub struct Param {
    key: Arc<str>,
    value: String,
}

impl Param {
    pub(crate) fn new(key: Arc<str>, value: String) -> Self {
        Self { key, value }
    }

    /// The parameter name (without the `:` prefix), or [`WILDCARD_KEY`].
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The matched path component.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// The ordered list of parameters produced by one lookup.
///
/// This is a sequence, not a map: positions correspond to the order
/// parameters are encountered during the walk, so the first parameter in
/// the pattern is index 0. The buffer is designed for reuse across
/// requests - [`Params::clear`] empties it but keeps its capacity.
#[derive(Debug, Default)]
pub struct Params {
    items: Vec<Param>,
}

impl Params {
    /// Creates an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty list with room for `capacity` parameters.
    ///
    /// Callers that reuse one buffer across requests size it from the
    /// maximum parameter count seen across all registered routes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, key: Arc<str>, value: String) {
        self.items.push(Param::new(key, value));
    }

    /// Returns the value of the first parameter named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|p| p.key() == key)
            .map(Param::value)
    }

    /// Returns the parameter at `index` in walk order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Param> {
        self.items.get(index)
    }

    /// Returns the catch-all capture, if the matched route ended in `*`.
    #[must_use]
    pub fn wildcard(&self) -> Option<&str> {
        self.get(WILDCARD_KEY)
    }

    /// Number of extracted parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no parameters were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empties the list, keeping its allocation for the next request.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates over the parameters in walk order.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
