use crate::clients::{ServiceClient, ValidationOutcome};
use crate::domain::payment::PaymentStatus;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

pub struct LiveClient {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LiveSession {
    id: String,
    #[serde(default)]
    title: String,
    status: String,
    #[serde(default)]
    payment_status: String,
    start_time: DateTime<Utc>,
    duration_minutes: i64,
    price_minor: i64,
    currency: String,
}

impl LiveClient {
    async fn fetch_session(&self, session_id: &str) -> Result<LiveSession> {
        let resp = self
            .client
            .get(format!("{}/sessions/{}", self.base_url, session_id))
            .bearer_auth(&self.api_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!(
                "live service returned status {}",
                resp.status().as_u16()
            ));
        }

        Ok(resp.json::<LiveSession>().await?)
    }
}

#[async_trait::async_trait]
impl ServiceClient for LiveClient {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn validate_payment(
        &self,
        service_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ValidationOutcome> {
        let session = self.fetch_session(service_id).await?;

        if session.status == "cancelled" {
            return Ok(ValidationOutcome::rejected("session has been cancelled"));
        }
        if session.payment_status == "completed" {
            return Ok(ValidationOutcome::rejected("session already paid"));
        }
        // Tickets are sold until the session ends, including mid-stream.
        let ends_at = session.start_time + Duration::minutes(session.duration_minutes);
        if Utc::now() > ends_at {
            return Ok(ValidationOutcome::rejected("session has already ended"));
        }
        if session.price_minor != amount_minor {
            return Ok(ValidationOutcome::rejected(format!(
                "amount mismatch, expected: {}, got: {}",
                session.price_minor, amount_minor
            )));
        }
        if session.currency != currency {
            return Ok(ValidationOutcome::rejected(format!(
                "currency mismatch, expected: {}, got: {}",
                session.currency, currency
            )));
        }

        let mut details = serde_json::Map::new();
        details.insert("session_id".to_string(), json!(session.id));
        details.insert("session_title".to_string(), json!(session.title));
        Ok(ValidationOutcome::ok(details))
    }

    async fn fetch_payment_status(&self, service_id: &str) -> Result<String> {
        let session = self.fetch_session(service_id).await?;
        if session.payment_status.is_empty() {
            Ok(session.status)
        } else {
            Ok(session.payment_status)
        }
    }

    async fn update_payment_status(
        &self,
        service_id: &str,
        payment_id: Uuid,
        status: &PaymentStatus,
    ) -> Result<()> {
        let resp = self
            .client
            .patch(format!("{}/sessions/{}/payment", self.base_url, service_id))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "payment_id": payment_id,
                "payment_status": status.as_str(),
            }))
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!(
                "failed to update session payment, status: {}",
                resp.status().as_u16()
            ));
        }
        Ok(())
    }
}
