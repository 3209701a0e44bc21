//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Subscriber (merchant) row from the database
///
/// Subscription fields stay null until the first payment is registered;
/// such subscribers are not evaluated by the reconciliation job.
#[derive(Debug, Clone, FromRow)]
pub struct SubscriberRow {
    pub id: Uuid,
    pub email: String,
    pub store_name: String,
    pub subscription_state: String,
    pub due_day: Option<i32>,
    pub anchor_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
    pub grace_days_remaining: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payment ledger row from the database
///
/// Append-only; never updated or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount_cents: i64,
    pub method: String,
    pub period_paid: String,
    pub state_before: String,
    pub state_after: String,
    pub created_at: DateTime<Utc>,
}

/// Staged notification row from the database
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub kind: String,
    pub notification_date: NaiveDate,
    pub days_remaining: Option<i32>,
    pub message: String,
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Conversion implementations from row types to vitrina-types domain ids
impl SubscriberRow {
    /// Convert to domain SubscriberId
    pub fn subscriber_id(&self) -> vitrina_types::SubscriberId {
        vitrina_types::SubscriberId(self.id)
    }
}

impl PaymentRow {
    /// Convert to domain PaymentId
    pub fn payment_id(&self) -> vitrina_types::PaymentId {
        vitrina_types::PaymentId(self.id)
    }
}

impl NotificationRow {
    /// Convert to domain NotificationId
    pub fn notification_id(&self) -> vitrina_types::NotificationId {
        vitrina_types::NotificationId(self.id)
    }
}
