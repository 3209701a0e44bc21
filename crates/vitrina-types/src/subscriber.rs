//! Subscriber identity and subscription lifecycle state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique subscriber (merchant) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub Uuid);

impl SubscriberId {
    /// Generate a new random subscriber ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a subscriber ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscription lifecycle state
///
/// Within a billing cycle the state only moves forward:
/// `Active -> PastDue -> InGrace -> PartiallyBlocked`. Only a registered
/// payment returns a subscriber to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    /// Subscriber is current; public catalog access granted
    Active,
    /// Due date passed today; start of the grace window
    PastDue,
    /// 1-7 days overdue; grace days counting down
    InGrace,
    /// More than 7 days overdue; public catalog access denied,
    /// admin dashboard remains reachable
    PartiallyBlocked,
}

impl SubscriptionState {
    /// Database/API string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::InGrace => "in_grace",
            Self::PartiallyBlocked => "partially_blocked",
        }
    }

    /// Whether the public storefront may render for this state
    pub fn allows_public_access(&self) -> bool {
        !matches!(self, Self::PartiallyBlocked)
    }
}

impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "past_due" => Ok(Self::PastDue),
            "in_grace" => Ok(Self::InGrace),
            "partially_blocked" => Ok(Self::PartiallyBlocked),
            other => Err(ParseStateError(other.to_string())),
        }
    }
}

/// Error parsing a subscription state string
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown subscription state: {0}")]
pub struct ParseStateError(pub String);

/// Subscription fields of a subscriber, as seen by the lifecycle logic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    /// Subscriber ID
    pub id: SubscriberId,
    /// Current lifecycle state
    pub state: SubscriptionState,
    /// Fixed day-of-month the payment is expected (set at first payment)
    pub due_day: Option<u32>,
    /// Date the first payment was recorded; immutable once set
    pub anchor_date: Option<NaiveDate>,
    /// Date of the most recent payment
    pub last_payment_date: Option<NaiveDate>,
    /// Next expected payment date; recomputed on every registration
    pub next_due_date: Option<NaiveDate>,
    /// Days of grace left; meaningful only in `InGrace`
    pub grace_days_remaining: i32,
}

impl Subscriber {
    /// Whether this subscriber has entered subscription management
    /// (first payment registered, due date known)
    pub fn is_managed(&self) -> bool {
        self.next_due_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn state_round_trips_through_str() {
        for state in [
            SubscriptionState::Active,
            SubscriptionState::PastDue,
            SubscriptionState::InGrace,
            SubscriptionState::PartiallyBlocked,
        ] {
            assert_eq!(SubscriptionState::from_str(state.as_str()).unwrap(), state);
        }
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert!(SubscriptionState::from_str("Activo").is_err());
        assert!(SubscriptionState::from_str("").is_err());
    }

    #[test]
    fn only_partially_blocked_denies_access() {
        assert!(SubscriptionState::Active.allows_public_access());
        assert!(SubscriptionState::PastDue.allows_public_access());
        assert!(SubscriptionState::InGrace.allows_public_access());
        assert!(!SubscriptionState::PartiallyBlocked.allows_public_access());
    }
}
