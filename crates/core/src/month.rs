//! Calendar month at month granularity (`MM-YYYY` on the wire).

use core::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::{DomainError, DomainResult};

/// A calendar month, stored as the first day of that month.
///
/// The wire form is `MM-YYYY`: a zero-padded two-digit month and a four-digit
/// year. Ordering follows the calendar, which is what the subscription date-range
/// invariant compares.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    /// Build from a numeric year and month (`1..=12`).
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| DomainError::parse(format!("month {month:02} of year {year} is out of range")))
    }

    /// Parse the strict `MM-YYYY` form.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let invalid = || DomainError::parse(format!("{raw:?} does not match MM-YYYY"));

        let (month, year) = raw.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(invalid());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Self::new(year, month)
    }

    /// Truncate a full date to its month. Store rows are read through this.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The first day of the month.
    pub fn as_date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl core::str::FromStr for MonthYear {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<MonthYear> for NaiveDate {
    fn from(value: MonthYear) -> Self {
        value.0
    }
}
