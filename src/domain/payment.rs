use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    #[serde(alias = "succeeded")]
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    // terminal statuses are never overwritten by reconciliation
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Paid | PaymentStatus::Failed | PaymentStatus::Refunded
        )
    }

    pub fn parse(s: &str) -> PaymentStatus {
        match s {
            "processing" => PaymentStatus::Processing,
            "paid" | "succeeded" => PaymentStatus::Paid,
            "failed" => PaymentStatus::Failed,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::Pending,
        }
    }

    // unrecognized downstream statuses yield None and are skipped
    pub fn from_service_status(s: &str) -> Option<PaymentStatus> {
        match s.to_ascii_lowercase().as_str() {
            "paid" | "succeeded" | "confirmed" | "completed" => Some(PaymentStatus::Paid),
            "processing" => Some(PaymentStatus::Processing),
            "pending" | "reserved" => Some(PaymentStatus::Pending),
            "failed" | "cancelled" | "canceled" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub amount_minor: i64,
    pub currency: String,
    pub gateway: String,
    #[serde(default)]
    pub gateway_payment_id: Option<String>,
    pub status: PaymentStatus,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub amount_minor: i64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}
