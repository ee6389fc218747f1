//! The handler abstraction and flattened chains.
//!
//! A handler is one capability: "callable with the request context".
//! Every shape the registration API accepts (closures, function pointers,
//! custom types) is adapted into [`ArcHandler`] when the route is
//! registered; request time never branches on type.

use std::sync::Arc;

use crate::context::RequestContext;

/// A handler that processes a request through the shared context.
///
/// Middleware and terminal handlers share this trait; the only difference
/// is their position in the chain. A middleware calls
/// [`RequestContext::next`] exactly once to advance; a handler that never
/// advances short-circuits the remainder of the chain.
///
/// Implementations must be `Send + Sync`: chains are shared across
/// concurrent requests.
pub trait Handler: Send + Sync {
    /// Processes the request.
    fn call(&self, ctx: &mut RequestContext);

    /// Returns the handler name for debugging and logging.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Implement `Handler` for plain functions and closures.
impl<F> Handler for F
where
    F: Fn(&mut RequestContext) + Send + Sync,
{
    fn call(&self, ctx: &mut RequestContext) {
        self(ctx);
    }
}

/// A shared, type-erased handler.
pub type ArcHandler = Arc<dyn Handler>;

/// The flattened, ordered handler sequence for one (method, route) pair:
/// inherited middleware first, the terminal route handler last.
///
/// Chains are immutable once built and cheap to clone (a shared slice),
/// so the dispatcher hands the same chain to every matching request.
#[derive(Clone)]
pub struct HandlerChain {
    handlers: Arc<[ArcHandler]>,
}

impl HandlerChain {
    /// Builds a chain from registration order.
    #[must_use]
    pub fn new(handlers: Vec<ArcHandler>) -> Self {
        Self {
            handlers: Arc::from(handlers),
        }
    }

    /// Number of handlers in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` for a chain with no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&ArcHandler> {
        self.handlers.get(index)
    }
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .finish_non_exhaustive()
    }
}
