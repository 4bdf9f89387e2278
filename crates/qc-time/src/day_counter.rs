//! Day-count conventions for converting date intervals to year fractions.

use crate::date::Date;
use qc_core::Time;

/// A day-count convention.
pub trait DayCounter: std::fmt::Debug {
    /// Convention name for display.
    fn name(&self) -> &str;

    /// Number of days between two dates under this convention.
    fn day_count(&self, d1: Date, d2: Date) -> i32 {
        d2 - d1
    }

    /// Year fraction between two dates.
    fn year_fraction(&self, d1: Date, d2: Date) -> Time;
}

/// Actual/360 convention.
#[derive(Clone, Copy, Debug, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "Actual/360"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Time / 360.0
    }
}

/// Actual/365 (Fixed) convention.
#[derive(Clone, Copy, Debug, Default)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn name(&self) -> &str {
        "Actual/365 (Fixed)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Time / 365.0
    }
}

/// 30/360 (Bond Basis) convention.
#[derive(Clone, Copy, Debug, Default)]
pub struct Thirty360;

impl DayCounter for Thirty360 {
    fn name(&self) -> &str {
        "30/360 (Bond Basis)"
    }

    fn day_count(&self, d1: Date, d2: Date) -> i32 {
        let dd1 = (d1.day_of_month() as i32).min(30);
        let mut dd2 = d2.day_of_month() as i32;
        if dd2 == 31 && dd1 == 30 {
            dd2 = 30;
        }
        360 * (d2.year() as i32 - d1.year() as i32)
            + 30 * (d2.month() as i32 - d1.month() as i32)
            + (dd2 - dd1)
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Time / 360.0
    }
}
