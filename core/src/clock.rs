//! Reference "today" for as-of defaults and export filenames.
//!
//! RULE: Nothing in the pipeline reads the system date directly.
//! Sessions take a Clock so tests can pin the date.

use chrono::NaiveDate;

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Current UTC calendar date, matching the midnight-UTC as-of instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// A clock frozen on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub day: NaiveDate,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self { day }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.day
    }
}
