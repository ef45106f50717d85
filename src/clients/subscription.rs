use crate::clients::{ServiceClient, ValidationOutcome};
use crate::domain::payment::PaymentStatus;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

pub struct SubscriptionClient {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Subscription {
    id: String,
    user_id: String,
    plan_id: String,
    status: String,
    amount_minor: i64,
    currency: String,
}

impl SubscriptionClient {
    async fn fetch_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        let resp = self
            .client
            .get(format!(
                "{}/subscriptions/{}",
                self.base_url, subscription_id
            ))
            .bearer_auth(&self.api_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!(
                "subscription service returned status {}",
                resp.status().as_u16()
            ));
        }

        Ok(resp.json::<Subscription>().await?)
    }
}

#[async_trait::async_trait]
impl ServiceClient for SubscriptionClient {
    fn name(&self) -> &'static str {
        "subscription"
    }

    async fn validate_payment(
        &self,
        service_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ValidationOutcome> {
        let sub = self.fetch_subscription(service_id).await?;

        // Renewal charges against an active subscription are valid too.
        if sub.status != "pending" && sub.status != "trialing" && sub.status != "active" {
            return Ok(ValidationOutcome::rejected(format!(
                "subscription is not payable, status: {}",
                sub.status
            )));
        }
        if sub.amount_minor != amount_minor {
            return Ok(ValidationOutcome::rejected(format!(
                "amount mismatch, expected: {}, got: {}",
                sub.amount_minor, amount_minor
            )));
        }
        if sub.currency != currency {
            return Ok(ValidationOutcome::rejected(format!(
                "currency mismatch, expected: {}, got: {}",
                sub.currency, currency
            )));
        }

        let mut details = serde_json::Map::new();
        details.insert("subscription_id".to_string(), json!(sub.id));
        details.insert("user_id".to_string(), json!(sub.user_id));
        details.insert("plan_id".to_string(), json!(sub.plan_id));
        Ok(ValidationOutcome::ok(details))
    }

    async fn fetch_payment_status(&self, service_id: &str) -> Result<String> {
        let sub = self.fetch_subscription(service_id).await?;
        Ok(sub.status)
    }

    async fn update_payment_status(
        &self,
        service_id: &str,
        payment_id: Uuid,
        status: &PaymentStatus,
    ) -> Result<()> {
        let resp = self
            .client
            .patch(format!(
                "{}/subscriptions/{}/payment",
                self.base_url, service_id
            ))
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
                "failed to update subscription payment, status: {}",
                resp.status().as_u16()
            ));
        }
        Ok(())
    }
}
