use crate::clients::{ServiceClient, ValidationOutcome};
use crate::domain::payment::PaymentStatus;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

pub struct EcommerceClient {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Order {
    id: String,
    user_id: String,
    status: String,
    #[serde(default)]
    payment_status: String,
    total_minor: i64,
    currency: String,
    #[serde(default)]
    item_count: u32,
}

impl EcommerceClient {
    async fn fetch_order(&self, order_id: &str) -> Result<Order> {
        let resp = self
            .client
            .get(format!("{}/orders/{}", self.base_url, order_id))
            .bearer_auth(&self.api_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!(
                "ecommerce service returned status {}",
                resp.status().as_u16()
            ));
        }

        Ok(resp.json::<Order>().await?)
    }
}

#[async_trait::async_trait]
impl ServiceClient for EcommerceClient {
    fn name(&self) -> &'static str {
        "ecommerce"
    }

    async fn validate_payment(
        &self,
        service_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ValidationOutcome> {
        let order = self.fetch_order(service_id).await?;

        if order.status != "pending" && order.status != "awaiting_payment" {
            return Ok(ValidationOutcome::rejected(format!(
                "order is not payable, status: {}",
                order.status
            )));
        }
        if order.payment_status == "completed" {
            return Ok(ValidationOutcome::rejected("order already paid"));
        }
        if order.total_minor != amount_minor {
            return Ok(ValidationOutcome::rejected(format!(
                "amount mismatch, expected: {}, got: {}",
                order.total_minor, amount_minor
            )));
        }
        if order.currency != currency {
            return Ok(ValidationOutcome::rejected(format!(
                "currency mismatch, expected: {}, got: {}",
                order.currency, currency
            )));
        }

        let mut details = serde_json::Map::new();
        details.insert("order_id".to_string(), json!(order.id));
        details.insert("user_id".to_string(), json!(order.user_id));
        details.insert("item_count".to_string(), json!(order.item_count));
        Ok(ValidationOutcome::ok(details))
    }

    async fn fetch_payment_status(&self, service_id: &str) -> Result<String> {
        let order = self.fetch_order(service_id).await?;
        if order.payment_status.is_empty() {
            Ok(order.status)
        } else {
            Ok(order.payment_status)
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
            .patch(format!("{}/orders/{}/payment", self.base_url, service_id))
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
                "failed to update order payment, status: {}",
                resp.status().as_u16()
            ));
        }
        Ok(())
    }
}
