//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// Subscriber repository trait
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Find a subscriber by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriberRow>>;

    /// List all subscribers with a known next due date
    /// (the reconciliation job's working set)
    async fn list_with_due_date(&self) -> DbResult<Vec<SubscriberRow>>;

    /// Apply a lifecycle transition as a single conditional write.
    ///
    /// The update only lands if the stored `(state, grace_days_remaining)`
    /// still matches `from`; returns whether a row was updated. A `false`
    /// return means a concurrent payment or job run got there first.
    async fn apply_transition(&self, transition: ApplyTransition) -> DbResult<bool>;

    /// Register a payment atomically.
    ///
    /// Reads the subscriber under a row lock, derives the subscription
    /// fields from that locked row (`due_day` and `anchor_date` keep their
    /// stored values once set; the first payment fixes them to the payment
    /// date), rewrites the subscriber to `payment.state_after`, and appends
    /// the ledger entry recording the locked row's state as `state_before`.
    /// All in one transaction; on any failure neither write survives.
    async fn register_payment(&self, payment: RegisterPayment) -> DbResult<PaymentRegistration>;
}

/// Conditional lifecycle state update
#[derive(Debug, Clone)]
pub struct ApplyTransition {
    pub subscriber_id: Uuid,
    pub from_state: String,
    pub from_grace_days: i32,
    pub to_state: String,
    pub to_grace_days: i32,
}

/// Payment registration input
///
/// Only the facts of the payment itself; `state_before`, `due_day`, and the
/// next due date are derived from the subscriber row under lock.
#[derive(Debug, Clone)]
pub struct RegisterPayment {
    pub payment_id: Uuid,
    pub subscriber_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount_cents: i64,
    pub method: String,
    pub period_paid: String,
    /// State the subscriber is rewritten to (a payment always reactivates)
    pub state_after: String,
}

/// Outcome of an atomic payment registration
#[derive(Debug, Clone)]
pub struct PaymentRegistration {
    /// Ledger entry as written, `state_before` taken from the locked row
    pub payment: PaymentRow,
    /// Due day in effect after the registration
    pub due_day: i32,
    /// Next due date derived from the locked row's due day
    pub next_due_date: NaiveDate,
}

/// Payment ledger repository trait (read side; entries are appended only
/// through [`SubscriberRepository::register_payment`])
#[async_trait]
pub trait PaymentLedgerRepository: Send + Sync {
    /// List ledger entries for a subscriber, most recent first
    async fn list_for_subscriber(
        &self,
        subscriber_id: Uuid,
        limit: i64,
    ) -> DbResult<Vec<PaymentRow>>;
}

/// Notification repository trait
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Whether a notification with this key already exists
    /// (idempotency guard for the reconciliation job)
    async fn exists(&self, subscriber_id: Uuid, kind: &str, date: NaiveDate) -> DbResult<bool>;

    /// Create a new staged notification
    async fn create(&self, notification: CreateNotification) -> DbResult<NotificationRow>;

    /// List staged notifications not yet delivered
    async fn list_unsent(&self, limit: i64) -> DbResult<Vec<NotificationRow>>;

    /// Mark a notification as delivered
    async fn mark_sent(&self, id: Uuid) -> DbResult<()>;
}

/// Create notification input
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub kind: String,
    pub notification_date: NaiveDate,
    pub days_remaining: Option<i32>,
    pub message: String,
}
