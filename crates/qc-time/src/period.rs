//! `Period` — a time span expressed in a [`TimeUnit`].

use crate::frequency::Frequency;
use crate::time_unit::TimeUnit;
use qc_core::errors::{Error, Result};

/// A time span made up of an integer length and a [`TimeUnit`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit of time.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a new period.
    pub fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// Construct a `Period` from a [`Frequency`].
    pub fn from_frequency(freq: Frequency) -> Result<Self> {
        match freq {
            Frequency::Once => Err(Error::InvalidArgument(
                "cannot convert Once to a Period".into(),
            )),
            Frequency::Annual => Ok(Period::new(1, TimeUnit::Years)),
            Frequency::Semiannual => Ok(Period::new(6, TimeUnit::Months)),
            Frequency::Quarterly => Ok(Period::new(3, TimeUnit::Months)),
            Frequency::Monthly => Ok(Period::new(1, TimeUnit::Months)),
        }
    }

    /// Negate the period (reverse direction).
    pub fn negated(self) -> Self {
        Self {
            length: -self.length,
            unit: self.unit,
        }
    }
}

impl std::ops::Neg for Period {
    type Output = Self;
    fn neg(self) -> Self {
        self.negated()
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let abbr = match self.unit {
            TimeUnit::Days => "D",
            TimeUnit::Weeks => "W",
            TimeUnit::Months => "M",
            TimeUnit::Years => "Y",
        };
        write!(f, "{}{abbr}", self.length)
    }
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Period({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Period::new(3, TimeUnit::Months).to_string(), "3M");
        assert_eq!(Period::new(5, TimeUnit::Years).to_string(), "5Y");
        assert_eq!(Period::new(-6, TimeUnit::Months).to_string(), "-6M");
    }

    #[test]
    fn from_frequency() {
        assert_eq!(
            Period::from_frequency(Frequency::Quarterly).unwrap(),
            Period::new(3, TimeUnit::Months)
        );
        assert!(Period::from_frequency(Frequency::Once).is_err());
    }
}
