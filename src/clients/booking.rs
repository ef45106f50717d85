use crate::clients::{ServiceClient, ValidationOutcome};
use crate::domain::payment::PaymentStatus;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

pub struct BookingClient {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Booking {
    id: String,
    user_id: String,
    class_id: String,
    status: String,
    #[serde(default)]
    payment_status: String,
    start_time: DateTime<Utc>,
    amount: i64,
    currency: String,
}

impl BookingClient {
    async fn fetch_booking(&self, booking_id: &str) -> Result<Booking> {
        let resp = self
            .client
            .get(format!("{}/bookings/{}", self.base_url, booking_id))
            .bearer_auth(&self.api_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!(
                "booking service returned status {}",
                resp.status().as_u16()
            ));
        }

        Ok(resp.json::<Booking>().await?)
    }
}

#[async_trait::async_trait]
impl ServiceClient for BookingClient {
    fn name(&self) -> &'static str {
        "booking"
    }

    async fn validate_payment(
        &self,
        service_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ValidationOutcome> {
        let booking = self.fetch_booking(service_id).await?;

        if booking.status != "pending" && booking.status != "reserved" {
            return Ok(ValidationOutcome::rejected(format!(
                "booking is not payable, status: {}",
                booking.status
            )));
        }
        if booking.payment_status == "completed" {
            return Ok(ValidationOutcome::rejected("booking already paid"));
        }
        if Utc::now() > booking.start_time {
            return Ok(ValidationOutcome::rejected("booking has already started"));
        }
        if booking.amount != amount_minor {
            return Ok(ValidationOutcome::rejected(format!(
                "amount mismatch, expected: {}, got: {}",
                booking.amount, amount_minor
            )));
        }
        if booking.currency != currency {
            return Ok(ValidationOutcome::rejected(format!(
                "currency mismatch, expected: {}, got: {}",
                booking.currency, currency
            )));
        }

        let mut details = serde_json::Map::new();
        details.insert("booking_id".to_string(), json!(booking.id));
        details.insert("user_id".to_string(), json!(booking.user_id));
        details.insert("class_id".to_string(), json!(booking.class_id));
        Ok(ValidationOutcome::ok(details))
    }

    async fn fetch_payment_status(&self, service_id: &str) -> Result<String> {
        let booking = self.fetch_booking(service_id).await?;
        if booking.payment_status.is_empty() {
            Ok(booking.status)
        } else {
            Ok(booking.payment_status)
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
            .patch(format!("{}/bookings/{}/payment", self.base_url, service_id))
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
                "failed to update booking payment, status: {}",
                resp.status().as_u16()
            ));
        }
        Ok(())
    }
}
