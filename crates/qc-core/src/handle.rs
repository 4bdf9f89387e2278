//! `Handle<T>` — a relinkable, observable reference to a shared value.
//!
//! A handle is an indirection cell: all clones of a handle share one link,
//! so relinking any clone transparently redirects every holder to the new
//! target. The handle is itself observable; its observers are notified both
//! when the link is swapped and (when linked as an observer) whenever the
//! underlying target notifies, so a curve can register once with a handle
//! and see every upstream change.
//!
//! Dereferencing an empty handle fails with [`Error::EmptyHandle`].

use crate::errors::{Error, Result};
use crate::patterns::observable::{Observable, ObservableImpl, Observer};
use std::cell::RefCell;
use std::sync::{Arc, Weak};

struct Link<T: ?Sized> {
    target: Option<Arc<T>>,
    registered: bool,
}

/// State shared by every clone of one handle.
struct Shared<T: ?Sized> {
    link: RefCell<Link<T>>,
    observers: ObservableImpl,
}

/// Internal observer registered with the current target; forwards target
/// notifications to the handle's own observers.
struct Relay<T: ?Sized> {
    shared: Weak<Shared<T>>,
}

impl<T: ?Sized> Observer for Relay<T> {
    fn update(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.observers.notify();
        }
    }
}

/// A shared, relinkable, observable reference to a value of type `T`.
pub struct Handle<T: ?Sized> {
    shared: Arc<Shared<T>>,
    relay: Arc<Relay<T>>,
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            relay: self.relay.clone(),
        }
    }
}

impl<T: Observable + ?Sized + 'static> Handle<T> {
    /// Create an empty (unlinked) handle.
    pub fn empty() -> Self {
        let shared = Arc::new(Shared {
            link: RefCell::new(Link {
                target: None,
                registered: false,
            }),
            observers: ObservableImpl::new(),
        });
        let relay = Arc::new(Relay {
            shared: Arc::downgrade(&shared),
        });
        Self { shared, relay }
    }

    /// Create a handle linked to `target`, observing it.
    pub fn new(target: Arc<T>) -> Self {
        let handle = Self::empty();
        handle.link_to(target);
        handle
    }

    /// Link to `target`, registering as its observer.
    pub fn link_to(&self, target: Arc<T>) {
        self.relink(Some(target), true);
    }

    /// Link to `target`, optionally registering as its observer.
    pub fn link_to_with(&self, target: Arc<T>, as_observer: bool) {
        self.relink(Some(target), as_observer);
    }

    /// Detach from any target, leaving the handle empty.
    pub fn unlink(&self) {
        self.relink(None, true);
    }

    /// Dereference the handle.
    ///
    /// # Errors
    /// [`Error::EmptyHandle`] when the handle is unlinked.
    pub fn value(&self) -> Result<Arc<T>> {
        self.shared
            .link
            .borrow()
            .target
            .clone()
            .ok_or(Error::EmptyHandle)
    }

    /// `true` if the handle is currently unlinked.
    pub fn is_empty(&self) -> bool {
        self.shared.link.borrow().target.is_none()
    }

    fn relink(&self, target: Option<Arc<T>>, as_observer: bool) {
        let want_registered = as_observer && target.is_some();
        let old = {
            let mut link = self.shared.link.borrow_mut();
            let same_target = match (&link.target, &target) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if same_target && link.registered == want_registered {
                return;
            }
            let was_registered = link.registered;
            let old = std::mem::replace(&mut link.target, target.clone());
            link.registered = want_registered;
            if was_registered {
                old
            } else {
                None
            }
        };
        // Registration changes run outside the borrow: the targets may
        // themselves hold handles back to us.
        let relay = Arc::downgrade(&self.relay) as Weak<dyn Observer>;
        if let Some(old) = old {
            old.unregister_observer(&relay);
        }
        if want_registered {
            if let Some(t) = &target {
                t.register_observer(relay);
            }
        }
        // Every clone of this handle learns about the swap.
        self.shared.observers.notify();
    }
}

impl<T: Observable + ?Sized + 'static> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Observable for Handle<T> {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.shared.observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.shared.observers.unregister(observer);
    }

    fn notify_observers(&self) {
        self.shared.observers.notify();
    }
}

/// Two handles compare equal iff they resolve to the same underlying object
/// (by identity, not value); two empty handles compare equal.
impl<T: ?Sized> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        let a = self.shared.link.borrow();
        let b = other.shared.link.borrow();
        match (&a.target, &b.target) {
            (Some(x), Some(y)) => Arc::ptr_eq(x, y),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.shared.link.borrow().target.is_some() {
            write!(f, "Handle(linked)")
        } else {
            write!(f, "Handle(empty)")
        }
    }
}
