//! Property-based tests for the lifecycle state machine
//!
//! These verify the invariants the transition table promises:
//! - forward-only movement within a billing cycle
//! - grace days always within `[0, grace period]`
//! - stability: re-applying the same observation changes nothing
//! - anything past the grace period is blocked

use proptest::prelude::*;
use vitrina_subscription_core::advance;
use vitrina_types::SubscriptionState;

const GRACE: i32 = 7;

/// Order of states within a billing cycle
fn rank(state: SubscriptionState) -> u8 {
    match state {
        SubscriptionState::Active => 0,
        SubscriptionState::PastDue => 1,
        SubscriptionState::InGrace => 2,
        SubscriptionState::PartiallyBlocked => 3,
    }
}

fn arb_state() -> impl Strategy<Value = SubscriptionState> {
    prop_oneof![
        Just(SubscriptionState::Active),
        Just(SubscriptionState::PastDue),
        Just(SubscriptionState::InGrace),
        Just(SubscriptionState::PartiallyBlocked),
    ]
}

proptest! {
    /// Property: the machine never moves a state backward on its own
    #[test]
    fn prop_forward_only(
        state in arb_state(),
        grace in 0..=GRACE,
        overdue in -60i64..120,
    ) {
        let (new_state, _) = advance(state, grace, overdue, GRACE);
        prop_assert!(rank(new_state) >= rank(state));
    }

    /// Property: grace days stay within the window
    #[test]
    fn prop_grace_days_bounded(
        state in arb_state(),
        grace in 0..=GRACE,
        overdue in -60i64..120,
    ) {
        let (_, new_grace) = advance(state, grace, overdue, GRACE);
        prop_assert!((0..=GRACE).contains(&new_grace));
    }

    /// Property: applying the same observation twice equals applying it once
    #[test]
    fn prop_stable_under_reapplication(
        state in arb_state(),
        grace in 0..=GRACE,
        overdue in -60i64..120,
    ) {
        let (s1, g1) = advance(state, grace, overdue, GRACE);
        let (s2, g2) = advance(s1, g1, overdue, GRACE);
        prop_assert_eq!((s1, g1), (s2, g2));
    }

    /// Property: more than the grace period overdue always ends blocked
    #[test]
    fn prop_past_grace_is_blocked(
        state in arb_state(),
        grace in 0..=GRACE,
        overdue in (i64::from(GRACE) + 1)..120,
    ) {
        let (new_state, new_grace) = advance(state, grace, overdue, GRACE);
        prop_assert_eq!(new_state, SubscriptionState::PartiallyBlocked);
        prop_assert_eq!(new_grace, 0);
    }

    /// Property: not-yet-due observations never change anything
    #[test]
    fn prop_not_due_is_noop(
        state in arb_state(),
        grace in 0..=GRACE,
        overdue in -60i64..0,
    ) {
        prop_assert_eq!(advance(state, grace, overdue, GRACE), (state, grace));
    }

    /// Property: blocked is terminal for the machine
    #[test]
    fn prop_blocked_is_terminal(
        grace in 0..=GRACE,
        overdue in -60i64..120,
    ) {
        let (new_state, _) = advance(SubscriptionState::PartiallyBlocked, grace, overdue, GRACE);
        prop_assert_eq!(new_state, SubscriptionState::PartiallyBlocked);
    }

    /// Property: the countdown is non-increasing as days pass without payment
    #[test]
    fn prop_countdown_monotonic(
        overdue_a in 0i64..=7,
        step in 1i64..=20,
    ) {
        let (s1, g1) = advance(SubscriptionState::PastDue, GRACE, overdue_a, GRACE);
        let (_, g2) = advance(s1, g1, overdue_a + step, GRACE);
        prop_assert!(g2 <= g1);
    }
}
