//! Subscription lifecycle state machine
//!
//! A pure transition function over `(state, grace days, days overdue)`.
//! The machine is monotonic forward within a billing cycle: it never
//! reverts `InGrace` to `PastDue`, and `PartiallyBlocked` is terminal until
//! a payment is registered.

use vitrina_types::SubscriptionState;

/// Days of grace after a missed due date before public access is blocked
pub const GRACE_PERIOD_DAYS: i32 = 7;

/// Compute the lifecycle state after observing `days_overdue`.
///
/// Returns the resulting `(state, grace_days_remaining)` pair, which equals
/// the input pair when no transition applies. Transition rules:
///
/// - not yet due (`days_overdue < 0`): no change
/// - `PartiallyBlocked` is terminal; only a payment releases it
/// - `days_overdue > grace_period`: `PartiallyBlocked`, grace 0
/// - `days_overdue == 0` from `Active`: `PastDue`, full grace window
/// - `0 < days_overdue <= grace_period`: `InGrace` with the window minus the
///   days already consumed; an `InGrace` subscriber just refreshes the count
pub fn advance(
    current: SubscriptionState,
    grace_days: i32,
    days_overdue: i64,
    grace_period: i32,
) -> (SubscriptionState, i32) {
    if days_overdue < 0 || current == SubscriptionState::PartiallyBlocked {
        return (current, grace_days);
    }

    if days_overdue > i64::from(grace_period) {
        return (SubscriptionState::PartiallyBlocked, 0);
    }

    let remaining = (grace_period - days_overdue as i32).max(0);

    match current {
        SubscriptionState::Active if days_overdue == 0 => (SubscriptionState::PastDue, grace_period),
        SubscriptionState::InGrace => (SubscriptionState::InGrace, remaining),
        // PastDue (or Active when a run was missed) entering the grace window
        _ if days_overdue > 0 => (SubscriptionState::InGrace, remaining),
        _ => (current, grace_days),
    }
}
