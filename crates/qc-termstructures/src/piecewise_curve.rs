//! The lazily bootstrapped piecewise curve.
//!
//! One concrete type serves every family: the injected `CurveTraits`
//! decides what the nodes mean, and the matching query trait
//! (`DefaultProbabilityTermStructure`, `ZeroInflationTermStructure`,
//! `YoyInflationTermStructure`) reads them. Queries against the wrong
//! family fail with a data-integrity error.
//!
//! The curve is an observer of its evaluation context and of every input
//! its helpers depend on; any change marks it dirty, and the next query
//! triggers exactly one re-bootstrap.

use std::cell::{Cell, RefCell};
use std::sync::{Arc, Weak};

use qc_core::errors::{Error, Result};
use qc_core::{
    LazyObject, LazyState, Observable, Observer, Probability, Rate, Real, Time,
};
use qc_math::{Interpolation1D, InterpolationFactory};
use qc_time::{Date, DayCounter, EvaluationContext};

use crate::bootstrap_helpers::{BootstrapCurve, BootstrapHelper};
use crate::bootstrap_traits::CurveTraits;
use crate::default_probability_term_structure::DefaultProbabilityTermStructure;
use crate::inflation_term_structure::{YoyInflationTermStructure, ZeroInflationTermStructure};
use crate::iterative_bootstrap::IterativeBootstrap;
use crate::term_structure::TermStructure;

/// Calibrated state, rebuilt by every bootstrap run.
struct CurveNodes {
    dates: Vec<Date>,
    times: Vec<Time>,
    data: Vec<Real>,
    interpolation: Box<dyn Interpolation1D>,
}

/// A piecewise curve calibrated lazily from bootstrap helpers.
pub struct PiecewiseCurve {
    context: Arc<EvaluationContext>,
    day_counter: Box<dyn DayCounter>,
    traits: Box<dyn CurveTraits>,
    helpers: Vec<Box<dyn BootstrapHelper>>,
    factory: Box<dyn InterpolationFactory>,
    bootstrap: IterativeBootstrap,
    nodes: RefCell<Option<CurveNodes>>,
    bootstrap_count: Cell<usize>,
    lazy: LazyState,
}

impl PiecewiseCurve {
    /// Build a curve from helpers.
    ///
    /// Helpers are sorted by pillar date; duplicate pillars are rejected
    /// eagerly. The returned curve is already registered as an observer of
    /// the evaluation context and of every helper input, but nothing is
    /// calculated until the first query.
    pub fn new(
        context: Arc<EvaluationContext>,
        day_counter: Box<dyn DayCounter>,
        traits: Box<dyn CurveTraits>,
        mut helpers: Vec<Box<dyn BootstrapHelper>>,
        factory: Box<dyn InterpolationFactory>,
        bootstrap: IterativeBootstrap,
    ) -> Result<Arc<Self>> {
        if helpers.is_empty() {
            return Err(Error::DataIntegrity("no bootstrap helpers given".into()));
        }
        helpers.sort_by_key(|h| h.latest_date());
        for pair in helpers.windows(2) {
            if pair[0].latest_date() == pair[1].latest_date() {
                return Err(Error::DataIntegrity(format!(
                    "two helpers share the pillar date {}",
                    pair[0].latest_date()
                )));
            }
        }

        let curve = Arc::new(PiecewiseCurve {
            context,
            day_counter,
            traits,
            helpers,
            factory,
            bootstrap,
            nodes: RefCell::new(None),
            bootstrap_count: Cell::new(0),
            lazy: LazyState::new(),
        });

        let weak = Arc::downgrade(&curve) as Weak<dyn Observer>;
        curve.context.register_observer(weak.clone());
        for helper in &curve.helpers {
            helper.register_with(&weak);
        }
        Ok(curve)
    }

    /// How many times the bootstrap has actually run.
    pub fn bootstrap_count(&self) -> usize {
        self.bootstrap_count.get()
    }

    /// The calibrated `(date, value)` node pairs.
    pub fn nodes(&self) -> Result<Vec<(Date, Real)>> {
        self.calculate()?;
        let nodes = self.nodes.borrow();
        let nodes = nodes
            .as_ref()
            .ok_or_else(|| Error::DataIntegrity("curve has no calibrated nodes".into()))?;
        Ok(nodes.dates.iter().cloned().zip(nodes.data.iter().cloned()).collect())
    }

    /// Run `f` against a view of the calibrated curve, recalculating first
    /// if needed.
    fn with_view<R>(&self, f: impl FnOnce(&BootstrapCurve<'_>) -> Result<R>) -> Result<R> {
        self.calculate()?;
        let nodes = self.nodes.borrow();
        let nodes = nodes
            .as_ref()
            .ok_or_else(|| Error::DataIntegrity("curve has no calibrated nodes".into()))?;
        let view = BootstrapCurve {
            reference_date: nodes.dates[0],
            day_counter: self.day_counter.as_ref(),
            times: &nodes.times,
            data: &nodes.data,
            interpolation: nodes.interpolation.as_ref(),
            kind: self.traits.node_kind(),
        };
        f(&view)
    }
}

impl std::fmt::Debug for PiecewiseCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PiecewiseCurve({:?}, {} helpers, bootstrapped {} times)",
            self.traits.node_kind(),
            self.helpers.len(),
            self.bootstrap_count.get()
        )
    }
}

impl LazyObject for PiecewiseCurve {
    fn lazy_state(&self) -> &LazyState {
        &self.lazy
    }

    fn perform_calculations(&self) -> Result<()> {
        let result = self.bootstrap.run(
            self.context.evaluation_date(),
            self.day_counter.as_ref(),
            self.traits.as_ref(),
            &self.helpers,
            self.factory.as_ref(),
        )?;
        *self.nodes.borrow_mut() = Some(CurveNodes {
            dates: result.dates,
            times: result.times,
            data: result.data,
            interpolation: result.interpolation,
        });
        self.bootstrap_count.set(self.bootstrap_count.get() + 1);
        Ok(())
    }
}

impl Observer for PiecewiseCurve {
    fn update(&self) {
        self.invalidate();
    }
}

impl Observable for PiecewiseCurve {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.lazy.observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.lazy.observers.unregister(observer);
    }

    fn notify_observers(&self) {
        self.lazy.observers.notify();
    }
}

impl TermStructure for PiecewiseCurve {
    fn reference_date(&self) -> Date {
        self.context.evaluation_date()
    }

    fn day_counter(&self) -> &dyn DayCounter {
        self.day_counter.as_ref()
    }

    fn max_date(&self) -> Date {
        // Helpers are sorted, so the last pillar is the curve's horizon.
        self.helpers
            .last()
            .map(|h| h.latest_date())
            .unwrap_or_else(|| self.context.evaluation_date())
    }
}

impl DefaultProbabilityTermStructure for PiecewiseCurve {
    fn survival_probability(&self, t: Time) -> Result<Probability> {
        self.with_view(|view| view.survival_probability(t))
    }

    fn hazard_rate(&self, t: Time) -> Result<Rate> {
        self.with_view(|view| view.hazard_rate(t))
    }

    fn default_density(&self, t: Time) -> Result<Real> {
        self.with_view(|view| view.default_density(t))
    }
}

impl ZeroInflationTermStructure for PiecewiseCurve {
    fn zero_inflation_rate(&self, t: Time) -> Result<Rate> {
        self.with_view(|view| view.zero_inflation_rate(t))
    }
}

impl YoyInflationTermStructure for PiecewiseCurve {
    fn yoy_inflation_rate(&self, t: Time) -> Result<Rate> {
        self.with_view(|view| view.yoy_inflation_rate(t))
    }
}
