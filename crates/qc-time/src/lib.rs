//! # qc-time
//!
//! Date, period, day-counter, interest-rate, and evaluation-context types.
//!
//! Calendar arithmetic (holidays, business-day adjustment) is deliberately
//! absent: pillar dates arrive already adjusted.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `Date` type.
pub mod date;

/// `DayCounter` trait and built-in day-count conventions.
pub mod day_counter;

/// The session-scoped, observable evaluation date.
pub mod evaluation_context;

/// Payment / compounding frequency.
pub mod frequency;

/// `InterestRate` — a rate with compounding conventions attached.
pub mod interest_rate;

/// `Period` — a time span in a `TimeUnit`.
pub mod period;

/// `TimeUnit` — days, weeks, months, years.
pub mod time_unit;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use date::Date;
pub use day_counter::{Actual360, Actual365Fixed, DayCounter, Thirty360};
pub use evaluation_context::EvaluationContext;
pub use frequency::Frequency;
pub use interest_rate::InterestRate;
pub use period::Period;
pub use time_unit::TimeUnit;
