//! PostgreSQL subscriber repository implementation

use async_trait::async_trait;
use chrono::Datelike;
use sqlx::PgPool;
use uuid::Uuid;
use vitrina_types::calendar;

use crate::error::DbResult;
use crate::models::{PaymentRow, SubscriberRow};
use crate::repo::{ApplyTransition, PaymentRegistration, RegisterPayment, SubscriberRepository};

/// PostgreSQL subscriber repository
#[derive(Clone)]
pub struct PgSubscriberRepository {
    pool: PgPool,
}

impl PgSubscriberRepository {
    /// Create a new subscriber repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriberRepository for PgSubscriberRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriberRow>> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            SELECT id, email, store_name, subscription_state, due_day, anchor_date,
                   last_payment_date, next_due_date, grace_days_remaining,
                   created_at, updated_at
            FROM subscribers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_with_due_date(&self) -> DbResult<Vec<SubscriberRow>> {
        let rows = sqlx::query_as::<_, SubscriberRow>(
            r#"
            SELECT id, email, store_name, subscription_state, due_day, anchor_date,
                   last_payment_date, next_due_date, grace_days_remaining,
                   created_at, updated_at
            FROM subscribers
            WHERE next_due_date IS NOT NULL
            ORDER BY next_due_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn apply_transition(&self, t: ApplyTransition) -> DbResult<bool> {
        // Conditioned on the previously observed state so a concurrent
        // payment registration is never clobbered.
        let result = sqlx::query(
            r#"
            UPDATE subscribers
            SET subscription_state = $1, grace_days_remaining = $2, updated_at = NOW()
            WHERE id = $3 AND subscription_state = $4 AND grace_days_remaining = $5
            "#,
        )
        .bind(&t.to_state)
        .bind(t.to_grace_days)
        .bind(t.subscriber_id)
        .bind(&t.from_state)
        .bind(t.from_grace_days)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn register_payment(&self, payment: RegisterPayment) -> DbResult<PaymentRegistration> {
        let mut tx = self.pool.begin().await?;

        // Row lock so state_before and the derived due day cannot be raced
        // by the reconciliation job or a concurrent first payment.
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            SELECT id, email, store_name, subscription_state, due_day, anchor_date,
                   last_payment_date, next_due_date, grace_days_remaining,
                   created_at, updated_at
            FROM subscribers
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(payment.subscriber_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(crate::DbError::NotFound);
        };

        // The first payment fixes due_day and anchor_date permanently
        let due_day = row.due_day.unwrap_or(payment.payment_date.day() as i32);
        let anchor_date = row.anchor_date.unwrap_or(payment.payment_date);
        let next_due_date = calendar::next_due_date(due_day as u32, payment.payment_date);

        sqlx::query(
            r#"
            UPDATE subscribers
            SET due_day = $1,
                anchor_date = $2,
                last_payment_date = $3,
                next_due_date = $4,
                subscription_state = $5,
                grace_days_remaining = 0,
                updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(due_day)
        .bind(anchor_date)
        .bind(payment.payment_date)
        .bind(next_due_date)
        .bind(&payment.state_after)
        .bind(payment.subscriber_id)
        .execute(&mut *tx)
        .await?;

        let ledger_entry = sqlx::query_as::<_, PaymentRow>(
            r#"
            INSERT INTO payments (id, subscriber_id, payment_date, amount_cents,
                                  method, period_paid, state_before, state_after)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, subscriber_id, payment_date, amount_cents, method,
                      period_paid, state_before, state_after, created_at
            "#,
        )
        .bind(payment.payment_id)
        .bind(payment.subscriber_id)
        .bind(payment.payment_date)
        .bind(payment.amount_cents)
        .bind(&payment.method)
        .bind(&payment.period_paid)
        .bind(&row.subscription_state)
        .bind(&payment.state_after)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PaymentRegistration {
            payment: ledger_entry,
            due_day,
            next_due_date,
        })
    }
}
