//! Evaluation context: the observable evaluation date shared by pricing
//! components.
//!
//! The context is an ordinary object passed explicitly (by `Arc`) to every
//! term structure that needs it. Moving the evaluation date notifies all
//! registered observers, which lets curves re-anchor and re-bootstrap lazily.

use std::cell::Cell;
use std::sync::{Arc, Weak};

use crate::date::Date;
use qc_core::{Observable, ObservableImpl, Observer};

/// Shared evaluation-date state for a pricing session.
#[derive(Debug)]
pub struct EvaluationContext {
    evaluation_date: Cell<Date>,
    observers: ObservableImpl,
}

impl EvaluationContext {
    /// Create a context anchored at `evaluation_date`.
    pub fn new(evaluation_date: Date) -> Arc<Self> {
        Arc::new(EvaluationContext {
            evaluation_date: Cell::new(evaluation_date),
            observers: ObservableImpl::new(),
        })
    }

    /// The current evaluation date.
    pub fn evaluation_date(&self) -> Date {
        self.evaluation_date.get()
    }

    /// Move the evaluation date. Observers are notified only on an actual
    /// change.
    pub fn set_evaluation_date(&self, date: Date) {
        if self.evaluation_date.replace(date) != date {
            self.observers.notify();
        }
    }
}

impl Observable for EvaluationContext {
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
    struct Counter {
        hits: Cell<usize>,
    }

    impl Observer for Counter {
        fn update(&self) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    #[test]
    fn notifies_only_on_change() {
        let today = Date::from_ymd(2025, 6, 2).unwrap();
        let ctx = EvaluationContext::new(today);
        let counter = Arc::new(Counter {
            hits: Cell::new(0),
        });
        ctx.register_observer(Arc::downgrade(&counter) as Weak<dyn Observer>);

        ctx.set_evaluation_date(today);
        assert_eq!(counter.hits.get(), 0);

        let tomorrow = today.add_days(1).unwrap();
        ctx.set_evaluation_date(tomorrow);
        assert_eq!(counter.hits.get(), 1);
        assert_eq!(ctx.evaluation_date(), tomorrow);
    }
}
