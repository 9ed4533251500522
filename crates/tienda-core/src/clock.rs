//! "Today" as an injected dependency.
//!
//! Date-relative totals take a [`Clock`] instead of reading the system time,
//! so tests can pin the reference day.

use chrono::{NaiveDate, Utc};

pub trait Clock {
    /// The current calendar day (UTC).
    fn today(&self) -> NaiveDate;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always returns the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
