//! In-memory repositories for testing
//!
//! One store implements all three repository traits so the service sees a
//! consistent view, the way the Postgres implementations share a database.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use vitrina_db::{
    ApplyTransition, CreateNotification, DbError, DbResult, NotificationRepository,
    NotificationRow, PaymentLedgerRepository, PaymentRegistration, PaymentRow, RegisterPayment,
    SubscriberRepository, SubscriberRow,
};
use vitrina_types::calendar;

/// In-memory store implementing every repository trait
#[derive(Default, Clone)]
pub struct MockRepo {
    subscribers: Arc<DashMap<Uuid, SubscriberRow>>,
    payments: Arc<DashMap<Uuid, PaymentRow>>,
    notifications: Arc<DashMap<Uuid, NotificationRow>>,
}

impl MockRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a subscriber row directly
    pub fn insert_subscriber(&self, row: SubscriberRow) {
        self.subscribers.insert(row.id, row);
    }

    /// Read a subscriber row back
    pub fn subscriber(&self, id: Uuid) -> Option<SubscriberRow> {
        self.subscribers.get(&id).map(|r| r.value().clone())
    }

    /// All ledger entries for a subscriber, oldest first
    pub fn ledger(&self, subscriber_id: Uuid) -> Vec<PaymentRow> {
        let mut rows: Vec<PaymentRow> = self
            .payments
            .iter()
            .filter(|r| r.subscriber_id == subscriber_id)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| (r.payment_date, r.created_at));
        rows
    }

    /// All staged notifications for a subscriber
    pub fn staged_notifications(&self, subscriber_id: Uuid) -> Vec<NotificationRow> {
        self.notifications
            .iter()
            .filter(|r| r.subscriber_id == subscriber_id)
            .map(|r| r.value().clone())
            .collect()
    }

    /// Total staged notification count
    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }
}

#[async_trait]
impl SubscriberRepository for MockRepo {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriberRow>> {
        Ok(self.subscribers.get(&id).map(|r| r.value().clone()))
    }

    async fn list_with_due_date(&self) -> DbResult<Vec<SubscriberRow>> {
        let mut rows: Vec<SubscriberRow> = self
            .subscribers
            .iter()
            .filter(|r| r.next_due_date.is_some())
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| r.next_due_date);
        Ok(rows)
    }

    async fn apply_transition(&self, t: ApplyTransition) -> DbResult<bool> {
        let Some(mut row) = self.subscribers.get_mut(&t.subscriber_id) else {
            return Ok(false);
        };
        if row.subscription_state != t.from_state || row.grace_days_remaining != t.from_grace_days {
            return Ok(false);
        }
        row.subscription_state = t.to_state;
        row.grace_days_remaining = t.to_grace_days;
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn register_payment(&self, p: RegisterPayment) -> DbResult<PaymentRegistration> {
        // The map entry guard stands in for the Postgres row lock: the row
        // is read, derived from, and rewritten while it is held.
        let Some(mut row) = self.subscribers.get_mut(&p.subscriber_id) else {
            return Err(DbError::NotFound);
        };

        let due_day = row.due_day.unwrap_or(p.payment_date.day() as i32);
        let anchor_date = row.anchor_date.unwrap_or(p.payment_date);
        let next_due_date = calendar::next_due_date(due_day as u32, p.payment_date);
        let state_before = row.subscription_state.clone();

        row.due_day = Some(due_day);
        row.anchor_date = Some(anchor_date);
        row.last_payment_date = Some(p.payment_date);
        row.next_due_date = Some(next_due_date);
        row.subscription_state = p.state_after.clone();
        row.grace_days_remaining = 0;
        row.updated_at = Utc::now();
        drop(row);

        let payment = PaymentRow {
            id: p.payment_id,
            subscriber_id: p.subscriber_id,
            payment_date: p.payment_date,
            amount_cents: p.amount_cents,
            method: p.method,
            period_paid: p.period_paid,
            state_before,
            state_after: p.state_after,
            created_at: Utc::now(),
        };
        self.payments.insert(payment.id, payment.clone());
        Ok(PaymentRegistration {
            payment,
            due_day,
            next_due_date,
        })
    }
}

#[async_trait]
impl PaymentLedgerRepository for MockRepo {
    async fn list_for_subscriber(
        &self,
        subscriber_id: Uuid,
        limit: i64,
    ) -> DbResult<Vec<PaymentRow>> {
        let mut rows = self.ledger(subscriber_id);
        rows.reverse();
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

#[async_trait]
impl NotificationRepository for MockRepo {
    async fn exists(&self, subscriber_id: Uuid, kind: &str, date: NaiveDate) -> DbResult<bool> {
        Ok(self.notifications.iter().any(|r| {
            r.subscriber_id == subscriber_id && r.kind == kind && r.notification_date == date
        }))
    }

    async fn create(&self, n: CreateNotification) -> DbResult<NotificationRow> {
        let row = NotificationRow {
            id: n.id,
            subscriber_id: n.subscriber_id,
            kind: n.kind,
            notification_date: n.notification_date,
            days_remaining: n.days_remaining,
            message: n.message,
            sent: false,
            sent_at: None,
            created_at: Utc::now(),
        };
        self.notifications.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_unsent(&self, limit: i64) -> DbResult<Vec<NotificationRow>> {
        let mut rows: Vec<NotificationRow> = self
            .notifications
            .iter()
            .filter(|r| !r.sent)
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by_key(|r| r.created_at);
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn mark_sent(&self, id: Uuid) -> DbResult<()> {
        if let Some(mut row) = self.notifications.get_mut(&id) {
            row.sent = true;
            row.sent_at = Some(Utc::now());
        }
        Ok(())
    }
}

/// A subscriber under subscription management
pub fn managed_subscriber(
    state: &str,
    due_day: u32,
    next_due_date: NaiveDate,
    grace_days_remaining: i32,
) -> SubscriberRow {
    let id = Uuid::new_v4();
    SubscriberRow {
        id,
        email: format!("merchant-{id}@example.com"),
        store_name: "Test Store".to_string(),
        subscription_state: state.to_string(),
        due_day: Some(due_day as i32),
        anchor_date: Some(next_due_date - chrono::Months::new(1)),
        last_payment_date: Some(next_due_date - chrono::Months::new(1)),
        next_due_date: Some(next_due_date),
        grace_days_remaining,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A subscriber that has never registered a payment
pub fn unmanaged_subscriber() -> SubscriberRow {
    let id = Uuid::new_v4();
    SubscriberRow {
        id,
        email: format!("merchant-{id}@example.com"),
        store_name: "New Store".to_string(),
        subscription_state: "active".to_string(),
        due_day: None,
        anchor_date: None,
        last_payment_date: None,
        next_due_date: None,
        grace_days_remaining: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
