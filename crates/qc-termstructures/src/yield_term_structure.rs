//! Yield (discounting) term structures.

use std::sync::{Arc, Weak};

use qc_core::errors::{Error, Result};
use qc_core::{
    Compounding, DiscountFactor, Handle, Observable, ObservableImpl, Observer, Rate, Time,
};
use qc_quotes::SimpleQuote;
use qc_time::{Date, DayCounter, EvaluationContext, Frequency, InterestRate};

use crate::term_structure::TermStructure;

/// A discount curve.
pub trait YieldTermStructure: TermStructure {
    /// Discount factor at time `t` (years from the reference date).
    fn discount(&self, t: Time) -> Result<DiscountFactor>;

    /// Discount factor at a date.
    fn discount_date(&self, date: Date) -> Result<DiscountFactor> {
        self.discount(self.time_from_reference(date))
    }

    /// Zero rate at time `t` under the given conventions.
    fn zero_rate(
        &self,
        t: Time,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Result<InterestRate> {
        if t <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "zero rate requires positive time, got {t}"
            )));
        }
        let compound = 1.0 / self.discount(t)?;
        InterestRate::implied_rate(compound, t, compounding, frequency)
    }
}

// ── FlatForward ───────────────────────────────────────────────────────────────

/// A flat continuously compounded forward-rate curve.
///
/// The rate comes from a quote handle, so both quote changes and
/// evaluation-date moves are forwarded to observers.
#[derive(Debug)]
pub struct FlatForward {
    context: Arc<EvaluationContext>,
    rate: Handle<SimpleQuote>,
    day_counter: Box<dyn DayCounter>,
    observers: ObservableImpl,
}

impl FlatForward {
    /// A flat curve at a fixed rate.
    pub fn new(
        context: Arc<EvaluationContext>,
        rate: Rate,
        day_counter: Box<dyn DayCounter>,
    ) -> Arc<Self> {
        Self::with_quote(context, Handle::new(SimpleQuote::new(rate)), day_counter)
    }

    /// A flat curve driven by a quote handle.
    pub fn with_quote(
        context: Arc<EvaluationContext>,
        rate: Handle<SimpleQuote>,
        day_counter: Box<dyn DayCounter>,
    ) -> Arc<Self> {
        let curve = Arc::new(FlatForward {
            context,
            rate,
            day_counter,
            observers: ObservableImpl::new(),
        });
        let weak = Arc::downgrade(&curve) as Weak<dyn Observer>;
        curve.context.register_observer(weak.clone());
        curve.rate.register_observer(weak);
        curve
    }

    /// The current flat rate.
    pub fn rate(&self) -> Result<Rate> {
        use qc_quotes::Quote;
        self.rate.value()?.value()
    }
}

impl Observer for FlatForward {
    fn update(&self) {
        // Nothing is cached; just relay the change.
        self.observers.notify();
    }
}

impl Observable for FlatForward {
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

impl TermStructure for FlatForward {
    fn reference_date(&self) -> Date {
        self.context.evaluation_date()
    }

    fn day_counter(&self) -> &dyn DayCounter {
        self.day_counter.as_ref()
    }

    fn max_date(&self) -> Date {
        Date::MAX
    }
}

impl YieldTermStructure for FlatForward {
    fn discount(&self, t: Time) -> Result<DiscountFactor> {
        if t < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "discount requires non-negative time, got {t}"
            )));
        }
        Ok((-self.rate()? * t).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qc_time::Actual365Fixed;

    fn context() -> Arc<EvaluationContext> {
        EvaluationContext::new(Date::from_ymd(2025, 6, 2).unwrap())
    }

    #[test]
    fn flat_discounting() {
        let curve = FlatForward::new(context(), 0.02, Box::new(Actual365Fixed));
        assert_relative_eq!(curve.discount(0.0).unwrap(), 1.0);
        assert_relative_eq!(curve.discount(5.0).unwrap(), (-0.1f64).exp());
        assert!(curve.discount(-1.0).is_err());
    }

    #[test]
    fn zero_rate_recovers_flat_rate() {
        let curve = FlatForward::new(context(), 0.03, Box::new(Actual365Fixed));
        let zero = curve
            .zero_rate(4.0, Compounding::Continuous, Frequency::Annual)
            .unwrap();
        assert_relative_eq!(zero.rate(), 0.03, max_relative = 1e-12);
    }

    #[test]
    fn quote_change_reaches_observers() {
        use std::cell::Cell;

        #[derive(Debug)]
        struct Flag(Cell<bool>);
        impl Observer for Flag {
            fn update(&self) {
                self.0.set(true);
            }
        }

        let quote = SimpleQuote::new(0.02);
        let curve = FlatForward::with_quote(
            context(),
            Handle::new(quote.clone()),
            Box::new(Actual365Fixed),
        );
        let flag = Arc::new(Flag(Cell::new(false)));
        curve.register_observer(Arc::downgrade(&flag) as Weak<dyn Observer>);

        quote.set_value(0.025);
        assert!(flag.0.get());
        assert_relative_eq!(curve.rate().unwrap(), 0.025);
    }
}
