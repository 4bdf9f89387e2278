//! `LazyObject` — cached calculation guarded by a dirty flag.
//!
//! A lazy object caches an expensive computation and recalculates only when
//! one of its inputs changed. Upstream changes arrive as notifications
//! (`invalidate`), which mark the cache stale and forward the signal to the
//! object's own observers; the actual recomputation is deferred until the
//! value is next read through `calculate()`.

use crate::errors::Result;
use crate::patterns::observable::ObservableImpl;
use std::cell::Cell;

/// Trait for objects that lazily compute and cache their results.
///
/// Implementors provide [`perform_calculations`][Self::perform_calculations]
/// and expose their bookkeeping via [`lazy_state`][Self::lazy_state]; the
/// default methods handle the two-state (clean/dirty) machine.
///
/// Every query-facing accessor must call [`calculate`][Self::calculate]
/// before reading cached state — this is the single recompute point.
pub trait LazyObject {
    /// The bookkeeping fields (dirty flag, freeze count, own observers).
    fn lazy_state(&self) -> &LazyState;

    /// Perform the actual (expensive) calculation.
    fn perform_calculations(&self) -> Result<()>;

    /// Ensure cached results are up to date.
    ///
    /// Returns immediately when clean. Otherwise runs
    /// [`perform_calculations`][Self::perform_calculations]; on failure the
    /// object is left dirty so the next query retries from scratch — there
    /// is no partial-success caching.
    fn calculate(&self) -> Result<()> {
        let state = self.lazy_state();
        if !state.calculated.get() && state.frozen.get() == 0 {
            // Set before computing so re-entrant reads see a consistent flag.
            state.calculated.set(true);
            if let Err(e) = self.perform_calculations() {
                state.calculated.set(false);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Mark the cached result stale and forward the signal downstream.
    ///
    /// This is the behaviour an `Observer::update` implementation delegates
    /// to. Recomputation does not happen here.
    fn invalidate(&self) {
        let state = self.lazy_state();
        state.calculated.set(false);
        state.observers.notify();
    }

    /// `true` if the cache is currently valid.
    fn is_calculated(&self) -> bool {
        self.lazy_state().calculated.get()
    }

    /// Suppress recalculation until a matching [`unfreeze`][Self::unfreeze].
    fn freeze(&self) {
        let state = self.lazy_state();
        state.frozen.set(state.frozen.get() + 1);
    }

    /// Undo one [`freeze`][Self::freeze] call.
    fn unfreeze(&self) {
        let state = self.lazy_state();
        let count = state.frozen.get();
        if count > 0 {
            state.frozen.set(count - 1);
        }
    }
}

/// Bookkeeping fields required by [`LazyObject`].
///
/// Embed this in the implementing struct and return it from `lazy_state()`.
/// The embedded [`ObservableImpl`] is the object's own observer registry, so
/// invalidation can cascade without the implementor wiring it manually.
#[derive(Debug, Default)]
pub struct LazyState {
    /// `true` while the cached result is valid.
    pub calculated: Cell<bool>,
    /// Number of unmatched `freeze` calls.
    pub frozen: Cell<u32>,
    /// The lazy object's own observers.
    pub observers: ObservableImpl,
}

impl LazyState {
    /// Create a new state with a stale cache.
    pub fn new() -> Self {
        Self::default()
    }
}
