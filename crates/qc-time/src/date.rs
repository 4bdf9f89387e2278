//! `Date` — a calendar date stored as a serial number.
//!
//! Serial 1 = January 1, 1900; the valid range runs to December 31, 2199.
//! Serial 0 is reserved as the null-date sentinel.

use crate::time_unit::TimeUnit;
use qc_core::errors::{Error, Result};

/// A calendar date represented as a serial day number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Date(i32);

impl Date {
    /// The null date sentinel (serial 0).
    pub const NULL: Date = Date(0);

    /// Maximum valid date: December 31, 2199.
    pub const MAX: Date = Date(109_573);

    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from a serial number.
    pub fn from_serial(serial: i32) -> Result<Self> {
        if serial <= 0 || Date(serial) > Self::MAX {
            return Err(Error::Date(format!("serial {serial} out of range")));
        }
        Ok(Date(serial))
    }

    /// Create a date from year, month (1–12), and day of month.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        if !(1900..=2199).contains(&year) {
            return Err(Error::Date(format!("year {year} out of range [1900, 2199]")));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::Date(format!("month {month} out of range [1, 12]")));
        }
        let last = days_in_month(year, month);
        if day == 0 || day > last {
            return Err(Error::Date(format!(
                "day {day} out of range [1, {last}] for {year}-{month:02}"
            )));
        }
        Ok(Date(serial_from_ymd(year, month, day)))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The serial number.
    pub fn serial(&self) -> i32 {
        self.0
    }

    /// `true` if this is the null-date sentinel.
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// The year.
    pub fn year(&self) -> u16 {
        ymd_from_serial(self.0).0
    }

    /// The month (1–12).
    pub fn month(&self) -> u8 {
        ymd_from_serial(self.0).1
    }

    /// The day of the month.
    pub fn day_of_month(&self) -> u8 {
        ymd_from_serial(self.0).2
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Advance by `n` calendar days.
    pub fn add_days(self, n: i32) -> Result<Self> {
        Self::from_serial(self.0 + n)
    }

    /// Advance by `n` units, clamping the day of month where needed
    /// (e.g. Jan 31 + 1 month = Feb 28).
    pub fn advance(self, n: i32, unit: TimeUnit) -> Result<Self> {
        match unit {
            TimeUnit::Days => self.add_days(n),
            TimeUnit::Weeks => self.add_days(n * 7),
            TimeUnit::Months => {
                let (y, m, d) = ymd_from_serial(self.0);
                let months = (y as i32 - 1900) * 12 + (m as i32 - 1) + n;
                let new_y = 1900 + months.div_euclid(12);
                let new_m = (months.rem_euclid(12) + 1) as u8;
                if !(1900..=2199).contains(&new_y) {
                    return Err(Error::Date(format!("year {new_y} out of range")));
                }
                let new_y = new_y as u16;
                let new_d = d.min(days_in_month(new_y, new_m));
                Ok(Date(serial_from_ymd(new_y, new_m, new_d)))
            }
            TimeUnit::Years => self.advance(n * 12, TimeUnit::Months),
        }
    }

    /// Advance by a [`Period`](crate::period::Period).
    pub fn advance_period(self, period: crate::period::Period) -> Result<Self> {
        self.advance(period.length, period.unit)
    }

    /// Calendar days between `self` and `other` (positive if `other` later).
    pub fn days_between(self, other: Date) -> i32 {
        other.0 - self.0
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> i32 {
        self.0 - rhs.0
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return write!(f, "null date");
        }
        let (y, m, d) = ymd_from_serial(self.0);
        write!(f, "{y:04}-{m:02}-{d:02}")
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date({self})")
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Whether a given year is a leap year.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month/year.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!((1..=12).contains(&month));
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Cumulative day-of-year offset at the start of each month (non-leap).
const MONTH_OFFSET: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

fn serial_from_ymd(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    // 365 days per elapsed year plus one per elapsed leap year since 1900.
    let mut serial = (y - 1900) * 365;
    serial += (y - 1901) / 4 - (y - 1901) / 100 + (y - 1601) / 400;
    serial += MONTH_OFFSET[month as usize - 1];
    if month > 2 && is_leap_year(year) {
        serial += 1;
    }
    serial + day as i32
}

fn ymd_from_serial(serial: i32) -> (u16, u8, u8) {
    let mut y = (serial / 365 + 1900) as u16;
    while serial < serial_from_ymd(y, 1, 1) {
        y -= 1;
    }
    while y < 2199 && serial >= serial_from_ymd(y + 1, 1, 1) {
        y += 1;
    }
    let mut remaining = serial - serial_from_ymd(y, 1, 1) + 1;
    let mut m = 1u8;
    while remaining > days_in_month(y, m) as i32 {
        remaining -= days_in_month(y, m) as i32;
        m += 1;
    }
    (y, m, remaining as u8)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
