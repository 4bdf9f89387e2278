//! # quantcurve
//!
//! Reactive term-structure bootstrapping: observable market data feeding
//! lazily recalibrated piecewise curves through a generic iterative
//! bootstrap.
//!
//! This crate is a **façade** that re-exports the public items of the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `qc-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use quantcurve::quotes::SimpleQuote;
//!
//! let spread = SimpleQuote::new(0.01);
//! spread.set_value(0.0125);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, observer pattern, handles, errors.
pub use qc_core as core;

/// Dates, day counters, periods, the evaluation context.
pub use qc_time as time;

/// Interpolation kernels and root solvers.
pub use qc_math as math;

/// Observable market quotes.
pub use qc_quotes as quotes;

/// Term structures and the bootstrap machinery.
pub use qc_termstructures as termstructures;

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use std::sync::Arc;

    use crate::core::Handle;
    use crate::math::Linear;
    use crate::quotes::SimpleQuote;
    use crate::termstructures::{
        BootstrapHelper, IterativeBootstrap, PiecewiseCurve, ZeroCouponInflationSwapHelper,
        ZeroInflationTermStructure, ZeroInflationTraits,
    };
    use crate::time::{Actual365Fixed, Date, EvaluationContext, TimeUnit};

    // The whole pipeline through the façade: quote in, calibrated rate out.
    #[test]
    fn facade_builds_a_curve() {
        let today = Date::from_ymd(2025, 6, 2).unwrap();
        let ctx = EvaluationContext::new(today);
        let maturity = today.advance(5, TimeUnit::Years).unwrap();
        let helpers: Vec<Box<dyn BootstrapHelper>> = vec![Box::new(
            ZeroCouponInflationSwapHelper::new(
                Handle::new(SimpleQuote::new(0.02)),
                today,
                maturity,
            )
            .unwrap(),
        )];
        let curve: Arc<PiecewiseCurve> = PiecewiseCurve::new(
            ctx,
            Box::new(Actual365Fixed),
            Box::new(ZeroInflationTraits { base_rate: 0.02 }),
            helpers,
            Box::new(Linear),
            IterativeBootstrap::default(),
        )
        .unwrap();
        assert_relative_eq!(curve.zero_inflation_rate(5.0).unwrap(), 0.02, epsilon = 1e-10);
    }
}
