//! Inflation term structures.

use qc_core::errors::Result;
use qc_core::{Rate, Time};

use crate::term_structure::TermStructure;

/// A zero-coupon (breakeven) inflation curve.
pub trait ZeroInflationTermStructure: TermStructure {
    /// Breakeven zero-inflation rate from the base date to time `t`.
    fn zero_inflation_rate(&self, t: Time) -> Result<Rate>;
}

/// A year-on-year inflation curve.
pub trait YoyInflationTermStructure: TermStructure {
    /// Expected year-on-year inflation rate at time `t`.
    fn yoy_inflation_rate(&self, t: Time) -> Result<Rate>;
}
