//! Market quotes.

use std::cell::Cell;
use std::sync::{Arc, Weak};

use qc_core::errors::{Error, Result};
use qc_core::{Observable, ObservableImpl, Observer, Real};

/// A single observable market value.
pub trait Quote: Observable {
    /// The current value.
    ///
    /// Fails with [`Error::DataIntegrity`] when no value has been set.
    fn value(&self) -> Result<Real>;

    /// `true` if the quote currently holds a value.
    fn is_valid(&self) -> bool;
}

/// A quote whose value is set by hand.
///
/// Setting a different value (or clearing it) notifies registered
/// observers; setting the same value again is a no-op.
#[derive(Debug)]
pub struct SimpleQuote {
    value: Cell<Option<Real>>,
    observers: ObservableImpl,
}

impl SimpleQuote {
    /// A quote holding `value`.
    pub fn new(value: Real) -> Arc<Self> {
        Arc::new(SimpleQuote {
            value: Cell::new(Some(value)),
            observers: ObservableImpl::new(),
        })
    }

    /// A quote with no value yet.
    pub fn empty() -> Arc<Self> {
        Arc::new(SimpleQuote {
            value: Cell::new(None),
            observers: ObservableImpl::new(),
        })
    }

    /// Set the value, returning the previous one. Notifies on change.
    pub fn set_value(&self, value: Real) -> Option<Real> {
        let old = self.value.replace(Some(value));
        if old != Some(value) {
            self.observers.notify();
        }
        old
    }

    /// Clear the value. Notifies if a value was present.
    pub fn reset(&self) {
        if self.value.replace(None).is_some() {
            self.observers.notify();
        }
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Result<Real> {
        self.value
            .get()
            .ok_or_else(|| Error::DataIntegrity("quote has no value".into()))
    }

    fn is_valid(&self) -> bool {
        self.value.get().is_some()
    }
}

impl Observable for SimpleQuote {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.observers.unregister(observer);
    }

    fn notify_observers(&self) {
        self.observers.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Flag {
        fired: Cell<u32>,
    }

    impl Observer for Flag {
        fn update(&self) {
            self.fired.set(self.fired.get() + 1);
        }
    }

    #[test]
    fn set_value_notifies_on_change_only() {
        let quote = SimpleQuote::new(0.01);
        let flag = Arc::new(Flag { fired: Cell::new(0) });
        quote.register_observer(Arc::downgrade(&flag) as Weak<dyn Observer>);

        assert_eq!(quote.set_value(0.01), Some(0.01));
        assert_eq!(flag.fired.get(), 0);

        quote.set_value(0.02);
        assert_eq!(flag.fired.get(), 1);
        assert_eq!(quote.value().unwrap(), 0.02);
    }

    #[test]
    fn empty_quote_is_invalid() {
        let quote = SimpleQuote::empty();
        assert!(!quote.is_valid());
        assert!(quote.value().is_err());
        quote.set_value(1.5);
        assert!(quote.is_valid());
    }

    #[test]
    fn reset_notifies_once() {
        let quote = SimpleQuote::new(2.0);
        let flag = Arc::new(Flag { fired: Cell::new(0) });
        quote.register_observer(Arc::downgrade(&flag) as Weak<dyn Observer>);
        quote.reset();
        quote.reset();
        assert_eq!(flag.fired.get(), 1);
        assert!(!quote.is_valid());
    }
}
