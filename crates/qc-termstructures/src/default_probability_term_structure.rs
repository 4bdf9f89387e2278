//! Default-probability (credit) term structures.

use std::sync::{Arc, Weak};

use qc_core::errors::{Error, Result};
use qc_core::{Handle, Observable, ObservableImpl, Observer, Probability, Rate, Real, Time};
use qc_quotes::SimpleQuote;
use qc_time::{Date, DayCounter, EvaluationContext};

use crate::term_structure::TermStructure;

/// A credit curve expressed through survival probabilities.
pub trait DefaultProbabilityTermStructure: TermStructure {
    /// Probability of survival from the reference date to time `t`.
    fn survival_probability(&self, t: Time) -> Result<Probability>;

    /// Probability of default by time `t`.
    fn default_probability(&self, t: Time) -> Result<Probability> {
        Ok(1.0 - self.survival_probability(t)?)
    }

    /// Probability of default between `t1` and `t2`.
    fn default_probability_between(&self, t1: Time, t2: Time) -> Result<Probability> {
        if t1 > t2 {
            return Err(Error::InvalidArgument(format!(
                "default probability requires t1 <= t2, got [{t1}, {t2}]"
            )));
        }
        Ok(self.survival_probability(t1)? - self.survival_probability(t2)?)
    }

    /// Instantaneous hazard rate at time `t`.
    fn hazard_rate(&self, t: Time) -> Result<Rate>;

    /// Default density at time `t`: `f(t) = h(t) · S(t)`.
    fn default_density(&self, t: Time) -> Result<Real>;
}

// ── FlatHazardRate ────────────────────────────────────────────────────────────

/// A credit curve with a single constant hazard rate.
#[derive(Debug)]
pub struct FlatHazardRate {
    context: Arc<EvaluationContext>,
    hazard: Handle<SimpleQuote>,
    day_counter: Box<dyn DayCounter>,
    observers: ObservableImpl,
}

impl FlatHazardRate {
    /// A flat curve at a fixed hazard rate.
    pub fn new(
        context: Arc<EvaluationContext>,
        hazard: Rate,
        day_counter: Box<dyn DayCounter>,
    ) -> Arc<Self> {
        Self::with_quote(context, Handle::new(SimpleQuote::new(hazard)), day_counter)
    }

    /// A flat curve driven by a quote handle.
    pub fn with_quote(
        context: Arc<EvaluationContext>,
        hazard: Handle<SimpleQuote>,
        day_counter: Box<dyn DayCounter>,
    ) -> Arc<Self> {
        let curve = Arc::new(FlatHazardRate {
            context,
            hazard,
            day_counter,
            observers: ObservableImpl::new(),
        });
        let weak = Arc::downgrade(&curve) as Weak<dyn Observer>;
        curve.context.register_observer(weak.clone());
        curve.hazard.register_observer(weak);
        curve
    }

    fn hazard_value(&self) -> Result<Rate> {
        use qc_quotes::Quote;
        self.hazard.value()?.value()
    }
}

impl Observer for FlatHazardRate {
    fn update(&self) {
        self.observers.notify();
    }
}

impl Observable for FlatHazardRate {
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

impl TermStructure for FlatHazardRate {
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

impl DefaultProbabilityTermStructure for FlatHazardRate {
    fn survival_probability(&self, t: Time) -> Result<Probability> {
        if t < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "survival probability requires non-negative time, got {t}"
            )));
        }
        Ok((-self.hazard_value()? * t).exp())
    }

    fn hazard_rate(&self, _t: Time) -> Result<Rate> {
        self.hazard_value()
    }

    fn default_density(&self, t: Time) -> Result<Real> {
        Ok(self.hazard_value()? * self.survival_probability(t)?)
    }
}
