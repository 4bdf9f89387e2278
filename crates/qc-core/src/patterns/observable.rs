//! Observer / Observable pattern — the library's notification mechanism.
//!
//! An **Observable** object notifies registered **Observer**s whenever its
//! state changes; observers react in `update()`, typically by marking a
//! cached result stale (see [`LazyObject`](super::lazy_object::LazyObject)).
//!
//! Registration uses `Weak` references, so short-lived observers need not
//! unregister before being dropped: dead entries are silently skipped and
//! pruned on the next delivery. All methods take `&self` — observables are
//! shared via `Arc`, and the observer list uses interior mutability.
//!
//! The whole graph is single-threaded and cooperative: notification is
//! synchronous and completes before the mutating call returns, in
//! unspecified order.

use std::cell::RefCell;
use std::sync::{Arc, Weak};

/// An object that can notify interested parties when it changes.
pub trait Observable {
    /// Register an observer to receive future change notifications.
    fn register_observer(&self, observer: Weak<dyn Observer>);

    /// Remove a previously registered observer.
    fn unregister_observer(&self, observer: &Weak<dyn Observer>);

    /// Notify all currently registered observers that this object changed.
    fn notify_observers(&self);
}

/// An object that reacts to changes in [`Observable`]s it registered with.
pub trait Observer {
    /// Called by every observable this observer is registered with when that
    /// observable changes state.
    fn update(&self);
}

/// Reusable observer-list management.
///
/// Embed this in any type to give it the standard [`Observable`] behaviour
/// and delegate the trait methods to it.
pub struct ObservableImpl {
    observers: RefCell<Vec<Weak<dyn Observer>>>,
}

impl Default for ObservableImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservableImpl {
    /// Create a new, empty observer registry.
    pub fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Register an observer.
    pub fn register(&self, observer: Weak<dyn Observer>) {
        self.observers.borrow_mut().push(observer);
    }

    /// Remove an observer (by pointer identity of the `Weak`).
    pub fn unregister(&self, observer: &Weak<dyn Observer>) {
        self.observers
            .borrow_mut()
            .retain(|o| !Weak::ptr_eq(o, observer));
    }

    /// Notify all live observers, pruning dead `Weak` references.
    ///
    /// Delivery iterates over a snapshot taken before any callback runs, so
    /// observers may register or unregister (themselves or others) while
    /// being notified.
    pub fn notify(&self) {
        let snapshot: Vec<Arc<dyn Observer>> = self
            .observers
            .borrow()
            .iter()
            .filter_map(|w| w.upgrade())
            .collect();
        self.observers
            .borrow_mut()
            .retain(|w| w.upgrade().is_some());
        // Callbacks run outside the borrow.
        for obs in snapshot {
            obs.update();
        }
    }

    /// Number of currently live registrations (dead weaks not counted).
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|w| w.upgrade().is_some())
            .count()
    }
}

impl std::fmt::Debug for ObservableImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObservableImpl({} observers)", self.observers.borrow().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingObserver {
        count: Cell<u32>,
    }

    impl CountingObserver {
        fn new() -> Arc<Self> {
            Arc::new(Self { count: Cell::new(0) })
        }
    }

    impl Observer for CountingObserver {
        fn update(&self) {
            self.count.set(self.count.get() + 1);
        }
    }

    #[test]
    fn register_and_notify() {
        let obs = CountingObserver::new();
        let registry = ObservableImpl::new();
        registry.register(Arc::downgrade(&obs) as Weak<dyn Observer>);
        registry.notify();
        assert_eq!(obs.count.get(), 1);
        registry.notify();
        assert_eq!(obs.count.get(), 2);
    }

    #[test]
    fn dead_observer_silently_dropped() {
        let registry = ObservableImpl::new();
        {
            let obs = CountingObserver::new();
            registry.register(Arc::downgrade(&obs) as Weak<dyn Observer>);
        }
        // Observer gone; delivery must not fail and must prune the entry.
        registry.notify();
        assert_eq!(registry.observer_count(), 0);
    }

    #[test]
    fn unregister_stops_delivery() {
        let obs = CountingObserver::new();
        let weak = Arc::downgrade(&obs) as Weak<dyn Observer>;
        let registry = ObservableImpl::new();
        registry.register(weak.clone());
        registry.unregister(&weak);
        registry.notify();
        assert_eq!(obs.count.get(), 0);
    }

    #[test]
    fn unregister_during_notification_is_safe() {
        struct SelfRemoving {
            registry: Arc<ObservableImpl>,
            me: RefCell<Option<Weak<dyn Observer>>>,
            fired: Cell<bool>,
        }
        impl Observer for SelfRemoving {
            fn update(&self) {
                self.fired.set(true);
                if let Some(weak) = self.me.borrow().as_ref() {
                    self.registry.unregister(weak);
                }
            }
        }

        let registry = Arc::new(ObservableImpl::new());
        let obs = Arc::new(SelfRemoving {
            registry: registry.clone(),
            me: RefCell::new(None),
            fired: Cell::new(false),
        });
        let weak = Arc::downgrade(&obs) as Weak<dyn Observer>;
        *obs.me.borrow_mut() = Some(weak.clone());
        registry.register(weak);

        registry.notify();
        assert!(obs.fired.get());
        assert_eq!(registry.observer_count(), 0);
    }
}
