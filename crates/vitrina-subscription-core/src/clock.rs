//! Day-granularity clock
//!
//! Billing math works in whole UTC calendar days. The clock is injected so
//! workflows can be evaluated at any date in tests.

use chrono::{NaiveDate, Utc};

/// Source of "today" for subscription evaluation
pub trait Clock: Send + Sync {
    /// Current date, UTC, day granularity
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a fixed date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
