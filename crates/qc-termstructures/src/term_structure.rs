//! Base trait for all term structures.

use qc_core::{Observable, Time};
use qc_time::{Date, DayCounter};

/// Common interface of every term structure: an anchor date, a day counter
/// to turn dates into times, and a maximum date.
///
/// Term structures are observable so that curves built on top of them (or
/// handles pointing at them) hear about recalibrations.
pub trait TermStructure: Observable {
    /// The date to which all times are measured.
    fn reference_date(&self) -> Date;

    /// Day counter used for date-to-time conversion.
    fn day_counter(&self) -> &dyn DayCounter;

    /// The latest date for which the structure can return values.
    fn max_date(&self) -> Date;

    /// [`max_date`](Self::max_date) expressed as a time.
    fn max_time(&self) -> Time {
        self.time_from_reference(self.max_date())
    }

    /// Year fraction from the reference date to `date`.
    fn time_from_reference(&self, date: Date) -> Time {
        self.day_counter().year_fraction(self.reference_date(), date)
    }
}
