//! An interest rate tied to a compounding convention and frequency.

use crate::frequency::Frequency;
use qc_core::errors::{Error, Result};
use qc_core::{Compounding, DiscountFactor, Rate, Real, Time};

/// An interest rate with its quoting convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterestRate {
    rate: Rate,
    compounding: Compounding,
    frequency: Frequency,
}

impl InterestRate {
    /// Create an interest rate.
    pub fn new(rate: Rate, compounding: Compounding, frequency: Frequency) -> Self {
        InterestRate {
            rate,
            compounding,
            frequency,
        }
    }

    /// The raw rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// The compounding convention.
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// The compounding frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Compound factor over a period of `t` years.
    pub fn compound_factor(&self, t: Time) -> Result<Real> {
        if t < 0.0 {
            return Err(Error::InvalidArgument(format!("negative time {t}")));
        }
        Ok(match self.compounding {
            Compounding::Simple => 1.0 + self.rate * t,
            Compounding::Compounded => {
                let f = frequency_per_year(self.frequency)?;
                (1.0 + self.rate / f).powf(f * t)
            }
            Compounding::Continuous => (self.rate * t).exp(),
        })
    }

    /// Discount factor over a period of `t` years.
    pub fn discount_factor(&self, t: Time) -> Result<DiscountFactor> {
        Ok(1.0 / self.compound_factor(t)?)
    }

    /// The rate implied by a compound factor over `t` years.
    pub fn implied_rate(
        compound: Real,
        t: Time,
        compounding: Compounding,
        frequency: Frequency,
    ) -> Result<Self> {
        if compound <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "non-positive compound factor {compound}"
            )));
        }
        if t <= 0.0 {
            return Err(Error::InvalidArgument(format!("non-positive time {t}")));
        }
        let rate = match compounding {
            Compounding::Simple => (compound - 1.0) / t,
            Compounding::Compounded => {
                let f = frequency_per_year(frequency)?;
                (compound.powf(1.0 / (f * t)) - 1.0) * f
            }
            Compounding::Continuous => compound.ln() / t,
        };
        Ok(InterestRate::new(rate, compounding, frequency))
    }
}

fn frequency_per_year(frequency: Frequency) -> Result<Real> {
    match frequency.periods_per_year() {
        0 => Err(Error::InvalidArgument(
            "periodic compounding requires a recurring frequency".into(),
        )),
        f => Ok(f as Real),
    }
}

impl std::fmt::Display for InterestRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4}% {:?} {}",
            self.rate * 100.0,
            self.compounding,
            self.frequency
        )
    }
}
