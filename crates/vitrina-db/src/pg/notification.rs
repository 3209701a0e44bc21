//! PostgreSQL notification repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::NotificationRow;
use crate::repo::{CreateNotification, NotificationRepository};

/// PostgreSQL notification repository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new notification repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn exists(&self, subscriber_id: Uuid, kind: &str, date: NaiveDate) -> DbResult<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subscription_notifications
                WHERE subscriber_id = $1 AND kind = $2 AND notification_date = $3
            )
            "#,
        )
        .bind(subscriber_id)
        .bind(kind)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    async fn create(&self, n: CreateNotification) -> DbResult<NotificationRow> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO subscription_notifications
                (id, subscriber_id, kind, notification_date, days_remaining, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, subscriber_id, kind, notification_date, days_remaining,
                      message, sent, sent_at, created_at
            "#,
        )
        .bind(n.id)
        .bind(n.subscriber_id)
        .bind(&n.kind)
        .bind(n.notification_date)
        .bind(n.days_remaining)
        .bind(&n.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_unsent(&self, limit: i64) -> DbResult<Vec<NotificationRow>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, subscriber_id, kind, notification_date, days_remaining,
                   message, sent, sent_at, created_at
            FROM subscription_notifications
            WHERE sent = FALSE
            ORDER BY created_at
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn mark_sent(&self, id: Uuid) -> DbResult<()> {
        sqlx::query(
            "UPDATE subscription_notifications SET sent = TRUE, sent_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
