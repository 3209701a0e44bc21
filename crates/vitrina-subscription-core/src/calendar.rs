//! Billing calendar helpers
//!
//! The date arithmetic itself lives in [`vitrina_types::calendar`] so the
//! persistence layer can derive due dates under row locks; this module adds
//! the workflow-facing strict parser and re-exports the arithmetic.

use chrono::NaiveDate;

pub use vitrina_types::calendar::{billing_period, days_overdue, last_day_of_month, next_due_date};

use crate::error::SubscriptionError;

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate, SubscriptionError> {
    let parsed = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| SubscriptionError::InvalidInput(format!("invalid date: {s}")))?;

    // chrono accepts single-digit months/days; require the canonical form
    if parsed.format("%Y-%m-%d").to_string() != s {
        return Err(SubscriptionError::InvalidInput(format!(
            "date must be YYYY-MM-DD: {s}"
        )));
    }

    Ok(parsed)
}
