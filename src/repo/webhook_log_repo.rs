use crate::webhook::retry::{RetryFailureLog, WebhookRetryItem};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Clone)]
pub struct WebhookLogRepo {
    pub pool: PgPool,
}

#[async_trait]
impl RetryFailureLog for WebhookLogRepo {
    async fn record_retry_failure(&self, item: &WebhookRetryItem) -> Result<()> {
        self.insert(item, false).await
    }

    async fn record_permanent_failure(&self, item: &WebhookRetryItem) -> Result<()> {
        self.insert(item, true).await
    }
}

impl WebhookLogRepo {
    async fn insert(&self, item: &WebhookRetryItem, permanent: bool) -> Result<()> {
        sqlx::query(
            "INSERT INTO webhook_logs (payment_id, service_type, service_id, target_status, retry_count, permanent, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(item.payment_id)
        .bind(item.service_type.as_str())
        .bind(&item.service_id)
        .bind(item.status.as_str())
        .bind(item.retry_count as i32)
        .bind(permanent)
        .bind(&item.payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM webhook_logs WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
