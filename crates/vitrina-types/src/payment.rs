//! Payment ledger types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{SubscriberId, SubscriptionState};

/// Unique payment ledger entry identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub Uuid);

impl PaymentId {
    /// Generate a new random payment ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a payment was registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Entered by an administrator
    Manual,
    /// Recorded by an automated process
    Automatic,
}

impl PaymentMethod {
    /// Database/API string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatic",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "automatic" => Ok(Self::Automatic),
            other => Err(ParseMethodError(other.to_string())),
        }
    }
}

/// Error parsing a payment method string
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown payment method: {0}")]
pub struct ParseMethodError(pub String);

/// An immutable payment ledger entry
///
/// Entries are append-only and written exclusively by the payment
/// registration workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Ledger entry ID
    pub id: PaymentId,
    /// Subscriber the payment belongs to
    pub subscriber_id: SubscriberId,
    /// Date the payment was made
    pub payment_date: NaiveDate,
    /// Amount in minor currency units
    pub amount_cents: i64,
    /// How the payment was registered
    pub method: PaymentMethod,
    /// Billing period covered, `YYYY-MM`
    pub period_paid: String,
    /// Lifecycle state before the payment was registered
    pub state_before: SubscriptionState,
    /// Lifecycle state after (always `Active`)
    pub state_after: SubscriptionState,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
}
