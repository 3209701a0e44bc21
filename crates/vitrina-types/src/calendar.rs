//! Billing calendar arithmetic
//!
//! Due dates are month-anchored: the next due date is one month after the
//! reference date, with the day clamped to the target month's length. Due
//! day 31 therefore lands on Feb 28 (29 in leap years); the day-of-month is
//! not perfectly stable across short months and that is accepted behavior.

use chrono::{Datelike, NaiveDate};

/// Next occurrence of `due_day` after `reference`: one calendar month
/// ahead, day clamped to `min(due_day, last day of that month)`
pub fn next_due_date(due_day: u32, reference: NaiveDate) -> NaiveDate {
    let (year, month) = if reference.month() == 12 {
        (reference.year() + 1, 1)
    } else {
        (reference.year(), reference.month() + 1)
    };

    let day = due_day.clamp(1, last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day is valid for month")
}

/// Last valid day of a month (handles leap years)
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("first of month is valid")
        .pred_opt()
        .expect("date has a predecessor")
        .day()
}

/// Whole days elapsed since the due date; negative while not yet due
pub fn days_overdue(today: NaiveDate, next_due: NaiveDate) -> i64 {
    (today - next_due).num_days()
}

/// Billing period string for a date, `YYYY-MM`
pub fn billing_period(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn next_due_advances_one_month() {
        assert_eq!(next_due_date(15, date(2024, 1, 15)), date(2024, 2, 15));
        assert_eq!(next_due_date(1, date(2024, 3, 1)), date(2024, 4, 1));
    }

    #[test]
    fn next_due_wraps_year_end() {
        assert_eq!(next_due_date(20, date(2023, 12, 20)), date(2024, 1, 20));
    }

    #[test]
    fn next_due_clamps_short_months() {
        // Jan 31 -> Feb 29 in a leap year
        assert_eq!(next_due_date(31, date(2024, 1, 31)), date(2024, 2, 29));
        // Jan 31 -> Feb 28 in a common year
        assert_eq!(next_due_date(31, date(2023, 1, 31)), date(2023, 2, 28));
        // due day 31 paying in April lands on May 31 again
        assert_eq!(next_due_date(31, date(2024, 4, 30)), date(2024, 5, 31));
    }

    #[test]
    fn last_day_handles_leap_february() {
        assert_eq!(last_day_of_month(2024, 2), 29);
        assert_eq!(last_day_of_month(2023, 2), 28);
        assert_eq!(last_day_of_month(2024, 12), 31);
        assert_eq!(last_day_of_month(2024, 4), 30);
    }

    #[test]
    fn days_overdue_is_signed() {
        assert_eq!(days_overdue(date(2024, 2, 15), date(2024, 2, 15)), 0);
        assert_eq!(days_overdue(date(2024, 2, 19), date(2024, 2, 15)), 4);
        assert_eq!(days_overdue(date(2024, 2, 10), date(2024, 2, 15)), -5);
    }

    #[test]
    fn billing_period_is_zero_padded() {
        assert_eq!(billing_period(date(2024, 1, 15)), "2024-01");
        assert_eq!(billing_period(date(2024, 12, 1)), "2024-12");
    }
}
