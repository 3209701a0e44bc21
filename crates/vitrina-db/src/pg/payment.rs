//! PostgreSQL payment ledger repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::PaymentRow;
use crate::repo::PaymentLedgerRepository;

/// PostgreSQL payment ledger repository
#[derive(Clone)]
pub struct PgPaymentLedgerRepository {
    pool: PgPool,
}

impl PgPaymentLedgerRepository {
    /// Create a new payment ledger repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentLedgerRepository for PgPaymentLedgerRepository {
    async fn list_for_subscriber(
        &self,
        subscriber_id: Uuid,
        limit: i64,
    ) -> DbResult<Vec<PaymentRow>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, subscriber_id, payment_date, amount_cents, method,
                   period_paid, state_before, state_after, created_at
            FROM payments
            WHERE subscriber_id = $1
            ORDER BY payment_date DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(subscriber_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
