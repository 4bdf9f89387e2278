//! Bootstrap helpers and the curve view they price against.
//!
//! A helper wraps one market instrument: it exposes the quoted value, the
//! pillar date it pins down, and the quote implied by a candidate curve.
//! During a bootstrap the candidate curve is handed to the helper as a
//! borrowed [`BootstrapCurve`] view over the engine's working arrays, so
//! helpers never see (or mutate) the curve object itself.

use std::sync::Weak;

use qc_core::errors::{Error, Result};
use qc_core::{Handle, Observer, Probability, Rate, Real, Time};
use qc_math::Interpolation1D;
use qc_quotes::{Quote, SimpleQuote};
use qc_time::{Actual365Fixed, Date, DayCounter, EvaluationContext, Period, TimeUnit};

use crate::yield_term_structure::YieldTermStructure;

// ── Node kinds ────────────────────────────────────────────────────────────────

/// What the raw node values of a bootstrapped curve mean.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Nodes are survival probabilities S(t).
    SurvivalProbability,
    /// Nodes are instantaneous hazard rates; S(t) = exp(−∫h).
    HazardRate,
    /// Nodes are default densities; S(t) = 1 − ∫f.
    DefaultDensity,
    /// Nodes are breakeven zero-inflation rates.
    ZeroInflationRate,
    /// Nodes are year-on-year inflation rates.
    YoyInflationRate,
}

// ── Curve view ────────────────────────────────────────────────────────────────

/// A borrowed view of a (possibly partially built) curve.
///
/// `times` and `data` are the node arrays currently under construction;
/// `interpolation` spans them. Beyond the last node, credit queries
/// extrapolate at a flat hazard rate and inflation queries are flat in the
/// rate itself.
pub struct BootstrapCurve<'a> {
    /// Anchor date for time measurement.
    pub reference_date: Date,
    /// Day counter for date-to-time conversion.
    pub day_counter: &'a dyn DayCounter,
    /// Node times, starting at 0.
    pub times: &'a [Time],
    /// Raw node values, interpreted per `kind`.
    pub data: &'a [Real],
    /// Interpolation over `times`/`data`.
    pub interpolation: &'a dyn Interpolation1D,
    /// Meaning of the node values.
    pub kind: NodeKind,
}

impl BootstrapCurve<'_> {
    /// Year fraction from the reference date to `date`.
    pub fn time_from_reference(&self, date: Date) -> Time {
        self.day_counter.year_fraction(self.reference_date, date)
    }

    fn max_time(&self) -> Time {
        *self.times.last().unwrap_or(&0.0)
    }

    fn wrong_family(&self, wanted: &str) -> Error {
        Error::DataIntegrity(format!(
            "curve with {:?} nodes cannot answer {wanted} queries",
            self.kind
        ))
    }

    /// Integral of the interpolant from 0 to `t`, flat beyond the last node.
    fn integral(&self, t: Time) -> Real {
        let max = self.max_time();
        if t <= max {
            self.interpolation.primitive(t)
        } else {
            self.interpolation.primitive(max) + self.interpolation.value(max) * (t - max)
        }
    }

    /// Survival probability at `t` (credit kinds only).
    pub fn survival_probability(&self, t: Time) -> Result<Probability> {
        if t < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "survival probability requires non-negative time, got {t}"
            )));
        }
        match self.kind {
            NodeKind::SurvivalProbability => {
                let max = self.max_time();
                if t <= max {
                    Ok(self.interpolation.value(t))
                } else {
                    // Continue at the hazard rate implied at the last node.
                    let s_max = self.interpolation.value(max);
                    let hazard = -self.interpolation.derivative(max) / s_max;
                    Ok(s_max * (-hazard * (t - max)).exp())
                }
            }
            NodeKind::HazardRate => Ok((-self.integral(t)).exp()),
            NodeKind::DefaultDensity => Ok(1.0 - self.integral(t)),
            _ => Err(self.wrong_family("survival probability")),
        }
    }

    /// Instantaneous hazard rate at `t` (credit kinds only).
    pub fn hazard_rate(&self, t: Time) -> Result<Rate> {
        let max = self.max_time();
        let t_eff = t.min(max);
        match self.kind {
            NodeKind::SurvivalProbability => {
                let s = self.interpolation.value(t_eff);
                Ok(-self.interpolation.derivative(t_eff) / s)
            }
            NodeKind::HazardRate => Ok(self.interpolation.value(t_eff)),
            NodeKind::DefaultDensity => {
                let s = self.survival_probability(t)?;
                Ok(self.default_density(t)? / s)
            }
            _ => Err(self.wrong_family("hazard rate")),
        }
    }

    /// Default density at `t` (credit kinds only).
    pub fn default_density(&self, t: Time) -> Result<Real> {
        let max = self.max_time();
        match self.kind {
            NodeKind::SurvivalProbability | NodeKind::HazardRate => {
                let s = self.survival_probability(t)?;
                let hazard = self.hazard_rate(t)?;
                Ok(hazard * s)
            }
            NodeKind::DefaultDensity => Ok(self.interpolation.value(t.min(max))),
            _ => Err(self.wrong_family("default density")),
        }
    }

    /// Breakeven zero-inflation rate at `t`.
    pub fn zero_inflation_rate(&self, t: Time) -> Result<Rate> {
        match self.kind {
            NodeKind::ZeroInflationRate => Ok(self.flat_value(t)),
            _ => Err(self.wrong_family("zero-inflation rate")),
        }
    }

    /// Year-on-year inflation rate at `t`.
    pub fn yoy_inflation_rate(&self, t: Time) -> Result<Rate> {
        match self.kind {
            NodeKind::YoyInflationRate => Ok(self.flat_value(t)),
            _ => Err(self.wrong_family("year-on-year inflation rate")),
        }
    }

    /// Node value at `t`, flat outside the node range.
    fn flat_value(&self, t: Time) -> Real {
        let clamped = t
            .max(self.interpolation.x_min())
            .min(self.interpolation.x_max());
        self.interpolation.value(clamped)
    }
}

// ── Helper trait ──────────────────────────────────────────────────────────────

/// One market instrument feeding a bootstrap.
pub trait BootstrapHelper: std::fmt::Debug {
    /// The quoted market value this instrument must reprice to.
    fn quote(&self) -> Result<Real>;

    /// First date the instrument is sensitive to.
    fn earliest_date(&self) -> Date;

    /// The pillar date this instrument pins down.
    fn latest_date(&self) -> Date;

    /// The quote implied by a candidate curve.
    fn implied_quote(&self, curve: &BootstrapCurve<'_>) -> Result<Real>;

    /// Register `observer` with every input this helper depends on.
    fn register_with(&self, observer: &Weak<dyn Observer>);
}

// ── CDS helper ────────────────────────────────────────────────────────────────

/// A running-spread credit default swap.
///
/// `implied_quote` prices the premium and protection legs on a payment
/// grid generated from the tenor and returns the fair spread. Accrual on
/// default is approximated by weighting each coupon with the midpoint
/// survival over its period.
#[derive(Debug)]
pub struct CdsHelper {
    quote: Handle<SimpleQuote>,
    protection_start: Date,
    maturity: Date,
    recovery: Real,
    payment_tenor: Period,
    discount: Handle<dyn YieldTermStructure>,
    day_counter: Box<dyn DayCounter>,
}

impl CdsHelper {
    /// Fully explicit constructor.
    pub fn new(
        quote: Handle<SimpleQuote>,
        protection_start: Date,
        maturity: Date,
        recovery: Real,
        payment_tenor: Period,
        discount: Handle<dyn YieldTermStructure>,
        day_counter: Box<dyn DayCounter>,
    ) -> Result<Self> {
        if !(0.0..1.0).contains(&recovery) {
            return Err(Error::DataIntegrity(format!(
                "recovery rate {recovery} outside [0, 1)"
            )));
        }
        if maturity <= protection_start {
            return Err(Error::DataIntegrity(format!(
                "CDS maturity {maturity} not after protection start {protection_start}"
            )));
        }
        // A non-advancing tenor would make the payment grid endless.
        if payment_tenor.length <= 0 {
            return Err(Error::DataIntegrity(format!(
                "CDS payment tenor {payment_tenor} must be positive"
            )));
        }
        Ok(CdsHelper {
            quote,
            protection_start,
            maturity,
            recovery,
            payment_tenor,
            discount,
            day_counter,
        })
    }

    /// Market-convention constructor: protection from the evaluation date,
    /// maturity at the tenor, quarterly premiums, Actual/365F accruals.
    pub fn from_tenor(
        quote: Handle<SimpleQuote>,
        tenor: Period,
        context: &EvaluationContext,
        recovery: Real,
        discount: Handle<dyn YieldTermStructure>,
    ) -> Result<Self> {
        let start = context.evaluation_date();
        let maturity = start
            .advance_period(tenor)
            .map_err(|e| Error::DataIntegrity(format!("bad CDS tenor {tenor}: {e}")))?;
        Self::new(
            quote,
            start,
            maturity,
            recovery,
            Period::new(3, TimeUnit::Months),
            discount,
            Box::new(Actual365Fixed),
        )
    }

    /// Premium payment dates after the protection start, ending exactly at
    /// maturity.
    fn payment_grid(&self) -> Result<Vec<Date>> {
        let mut grid = Vec::new();
        let mut date = self.protection_start;
        let mut i = 1;
        while date < self.maturity {
            date = self
                .protection_start
                .advance(i * self.payment_tenor.length, self.payment_tenor.unit)
                .map_err(|e| Error::DataIntegrity(format!("CDS schedule: {e}")))?;
            grid.push(date.min(self.maturity));
            i += 1;
        }
        Ok(grid)
    }
}

impl BootstrapHelper for CdsHelper {
    fn quote(&self) -> Result<Real> {
        self.quote.value()?.value()
    }

    fn earliest_date(&self) -> Date {
        self.protection_start
    }

    fn latest_date(&self) -> Date {
        self.maturity
    }

    fn implied_quote(&self, curve: &BootstrapCurve<'_>) -> Result<Real> {
        let discount = self.discount.value()?;
        let mut annuity = 0.0;
        let mut protection = 0.0;
        // Protection already running at the reference date starts there.
        let mut prev_date = self.protection_start.max(curve.reference_date);
        let mut prev_survival = curve.survival_probability(curve.time_from_reference(prev_date))?;

        for date in self.payment_grid()? {
            if date <= prev_date {
                continue;
            }
            let t = curve.time_from_reference(date);
            let t_prev = curve.time_from_reference(prev_date);
            let survival = curve.survival_probability(t)?;
            let accrual = self.day_counter.year_fraction(prev_date, date);

            // Coupon paid on survival plus half a coupon on mid-period default.
            annuity += accrual * discount.discount(t)? * 0.5 * (prev_survival + survival);
            protection += (1.0 - self.recovery)
                * discount.discount(0.5 * (t_prev + t))?
                * (prev_survival - survival);

            prev_date = date;
            prev_survival = survival;
        }

        if annuity <= 0.0 {
            return Err(Error::DataIntegrity(format!(
                "CDS premium annuity {annuity} is not positive"
            )));
        }
        Ok(protection / annuity)
    }

    fn register_with(&self, observer: &Weak<dyn Observer>) {
        use qc_core::Observable;
        self.quote.register_observer(observer.clone());
        self.discount.register_observer(observer.clone());
    }
}

// ── Inflation swap helpers ────────────────────────────────────────────────────

/// A zero-coupon inflation swap: the quote is the breakeven zero-inflation
/// rate at maturity.
#[derive(Debug)]
pub struct ZeroCouponInflationSwapHelper {
    quote: Handle<SimpleQuote>,
    start: Date,
    maturity: Date,
}

impl ZeroCouponInflationSwapHelper {
    /// A helper pinning the zero-inflation rate at `maturity`.
    pub fn new(quote: Handle<SimpleQuote>, start: Date, maturity: Date) -> Result<Self> {
        if maturity <= start {
            return Err(Error::DataIntegrity(format!(
                "swap maturity {maturity} not after start {start}"
            )));
        }
        Ok(ZeroCouponInflationSwapHelper {
            quote,
            start,
            maturity,
        })
    }
}

impl BootstrapHelper for ZeroCouponInflationSwapHelper {
    fn quote(&self) -> Result<Real> {
        self.quote.value()?.value()
    }

    fn earliest_date(&self) -> Date {
        self.start
    }

    fn latest_date(&self) -> Date {
        self.maturity
    }

    fn implied_quote(&self, curve: &BootstrapCurve<'_>) -> Result<Real> {
        curve.zero_inflation_rate(curve.time_from_reference(self.maturity))
    }

    fn register_with(&self, observer: &Weak<dyn Observer>) {
        use qc_core::Observable;
        self.quote.register_observer(observer.clone());
    }
}

/// A year-on-year inflation swap: the quote is the fair year-on-year rate
/// at maturity.
#[derive(Debug)]
pub struct YoyInflationSwapHelper {
    quote: Handle<SimpleQuote>,
    start: Date,
    maturity: Date,
}

impl YoyInflationSwapHelper {
    /// A helper pinning the year-on-year rate at `maturity`.
    pub fn new(quote: Handle<SimpleQuote>, start: Date, maturity: Date) -> Result<Self> {
        if maturity <= start {
            return Err(Error::DataIntegrity(format!(
                "swap maturity {maturity} not after start {start}"
            )));
        }
        Ok(YoyInflationSwapHelper {
            quote,
            start,
            maturity,
        })
    }
}

impl BootstrapHelper for YoyInflationSwapHelper {
    fn quote(&self) -> Result<Real> {
        self.quote.value()?.value()
    }

    fn earliest_date(&self) -> Date {
        self.start
    }

    fn latest_date(&self) -> Date {
        self.maturity
    }

    fn implied_quote(&self, curve: &BootstrapCurve<'_>) -> Result<Real> {
        curve.yoy_inflation_rate(curve.time_from_reference(self.maturity))
    }

    fn register_with(&self, observer: &Weak<dyn Observer>) {
        use qc_core::Observable;
        self.quote.register_observer(observer.clone());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
