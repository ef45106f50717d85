use crate::domain::payment::{PaymentStatus, Refund};
use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct RefundsRepo {
    pub pool: PgPool,
}

impl RefundsRepo {
    pub async fn insert(&self, refund: &Refund) -> Result<()> {
        sqlx::query(
            "INSERT INTO refunds (id, payment_id, amount_minor, status, created_at, processed_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(refund.id)
        .bind(refund.payment_id)
        .bind(refund.amount_minor)
        .bind(refund.status.as_str())
        .bind(refund.created_at)
        .bind(refund.processed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn mark_processed(&self, id: Uuid, status: &PaymentStatus) -> Result<()> {
        sqlx::query("UPDATE refunds SET status = $2, processed_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
