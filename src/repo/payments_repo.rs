use crate::domain::payment::{Metadata, Payment, PaymentStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

impl PaymentsRepo {
    pub async fn upsert(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            "INSERT INTO payments (id, amount_minor, currency, gateway, gateway_payment_id, status, metadata, created_at, paid_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO UPDATE
             SET status = EXCLUDED.status,
                 metadata = EXCLUDED.metadata,
                 gateway_payment_id = EXCLUDED.gateway_payment_id,
                 paid_at = EXCLUDED.paid_at",
        )
        .bind(payment.id)
        .bind(payment.amount_minor)
        .bind(&payment.currency)
        .bind(&payment.gateway)
        .bind(&payment.gateway_payment_id)
        .bind(payment.status.as_str())
        .bind(serde_json::Value::Object(payment.metadata.clone()))
        .bind(payment.created_at)
        .bind(payment.paid_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query(
            "SELECT id, amount_minor, currency, gateway, gateway_payment_id, status, metadata, created_at, paid_at
             FROM payments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_payment))
    }

    pub async fn due_for_reconciliation(
        &self,
        created_before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            "SELECT id, amount_minor, currency, gateway, gateway_payment_id, status, metadata, created_at, paid_at
             FROM payments
             WHERE status IN ('pending', 'processing') AND created_at < $1
             ORDER BY created_at
             LIMIT $2",
        )
        .bind(created_before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(to_payment).collect())
    }

    pub async fn update_status(&self, id: Uuid, status: &PaymentStatus) -> Result<()> {
        let paid_at = if *status == PaymentStatus::Paid {
            Some(Utc::now())
        } else {
            None
        };
        sqlx::query(
            "UPDATE payments SET status = $2, paid_at = COALESCE($3, paid_at) WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(paid_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn to_payment(row: sqlx::postgres::PgRow) -> Payment {
    let metadata: serde_json::Value = row.get("metadata");
    let status: String = row.get("status");
    Payment {
        id: row.get("id"),
        amount_minor: row.get("amount_minor"),
        currency: row.get("currency"),
        gateway: row.get("gateway"),
        gateway_payment_id: row.get("gateway_payment_id"),
        status: PaymentStatus::parse(&status),
        metadata: metadata.as_object().cloned().unwrap_or_else(Metadata::new),
        created_at: row.get("created_at"),
        paid_at: row.get("paid_at"),
    }
}
