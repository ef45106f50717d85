use crate::config::WebhookConfig;
use crate::domain::payment::Payment;
use crate::domain::service_type::ServiceType;
use crate::integration::api_keys::{ApiKeyStore, WEBHOOK_SECRET_KEY};
use crate::webhook::retry::WebhookRetryItem;
use crate::webhook::signature;
use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const SIGNATURE_HEADER: &str = "X-Payment-Service-Signature";

const SEND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct WebhookEvent<'a> {
    payment_id: uuid::Uuid,
    service_type: ServiceType,
    service_id: &'a str,
    status: &'a str,
    amount: i64,
    currency: &'a str,
    gateway: &'a str,
    timestamp: i64,
}

#[derive(Clone)]
pub struct WebhookDispatcher {
    pub config: WebhookConfig,
    pub api_keys: Arc<ApiKeyStore>,
    pub client: reqwest::Client,
    pub retry_queue: mpsc::Sender<WebhookRetryItem>,
}

impl WebhookDispatcher {
    pub async fn notify(&self, payment: &Payment, service_type: ServiceType, service_id: &str) {
        let Some(url) = self.config.url_for(service_type).map(str::to_string) else {
            return;
        };

        let payload = self.build_payload(payment, service_type, service_id);

        if self.post_webhook(&url, &payload).await {
            return;
        }

        let item = WebhookRetryItem {
            service_type,
            service_id: service_id.to_string(),
            payment_id: payment.id,
            status: payment.status.clone(),
            payload,
            retry_count: 0,
            next_retry_at: Utc::now() + Duration::minutes(5),
        };
        if self.retry_queue.send(item).await.is_err() {
            tracing::error!(
                payment_id = %payment.id,
                "webhook retry queue closed, dropping notification"
            );
        }
    }

    // Signed over the serialized body before the signature field is
    // inserted, so signed bytes and delivered bytes match.
    fn build_payload(
        &self,
        payment: &Payment,
        service_type: ServiceType,
        service_id: &str,
    ) -> Value {
        let event = WebhookEvent {
            payment_id: payment.id,
            service_type,
            service_id,
            status: payment.status.as_str(),
            amount: payment.amount_minor,
            currency: &payment.currency,
            gateway: &payment.gateway,
            timestamp: Utc::now().timestamp(),
        };

        let mut body = serde_json::to_value(&event).unwrap_or_default();
        let secret = self.api_keys.get(WEBHOOK_SECRET_KEY).unwrap_or_default();
        let signature = if secret.is_empty() {
            String::new()
        } else {
            let raw = serde_json::to_vec(&body).unwrap_or_default();
            signature::sign(&secret, &raw)
        };
        if let Some(obj) = body.as_object_mut() {
            obj.insert("signature".to_string(), Value::String(signature));
        }
        body
    }

    pub(crate) async fn post_webhook(&self, url: &str, payload: &Value) -> bool {
        let signature = payload
            .get("signature")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let resp = self
            .client
            .post(url)
            .header(SIGNATURE_HEADER, signature)
            .json(payload)
            .timeout(std::time::Duration::from_secs(SEND_TIMEOUT_SECS))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => true,
            Ok(r) => {
                tracing::warn!(url, status = r.status().as_u16(), "webhook send rejected");
                false
            }
            Err(e) => {
                tracing::warn!(url, "webhook send failed: {}", e);
                false
            }
        }
    }
}
