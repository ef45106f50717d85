use crate::domain::payment::PaymentStatus;
use crate::domain::service_type::ServiceType;
use crate::webhook::dispatcher::WebhookDispatcher;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const MAX_RETRIES: u32 = 3;

pub const RETRY_QUEUE_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct WebhookRetryItem {
    pub service_type: ServiceType,
    pub service_id: String,
    pub payment_id: Uuid,
    pub status: PaymentStatus,
    pub payload: Value,
    pub retry_count: u32,
    pub next_retry_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    Requeue { retry_count: u32, delay: Duration },
    GiveUp,
}

// Linear backoff: the nth redelivery waits n * 5 minutes.
pub fn retry_delay(retry_count: u32) -> Duration {
    Duration::minutes(5 * i64::from(retry_count.max(1)))
}

pub fn after_failed_attempt(item: &WebhookRetryItem) -> RetryDecision {
    if item.retry_count < MAX_RETRIES {
        let next = item.retry_count + 1;
        RetryDecision::Requeue {
            retry_count: next,
            delay: retry_delay(next),
        }
    } else {
        RetryDecision::GiveUp
    }
}

#[async_trait]
pub trait RetryFailureLog: Send + Sync {
    async fn record_retry_failure(&self, item: &WebhookRetryItem) -> Result<()>;
    async fn record_permanent_failure(&self, item: &WebhookRetryItem) -> Result<()>;
}

pub struct WebhookRetryWorker {
    pub dispatcher: WebhookDispatcher,
    pub log_repo: Arc<dyn RetryFailureLog>,
    pub queue: mpsc::Receiver<WebhookRetryItem>,
    pub requeue: mpsc::Sender<WebhookRetryItem>,
}

impl WebhookRetryWorker {
    pub async fn run(mut self) {
        while let Some(item) = self.queue.recv().await {
            self.handle(item).await;
        }
    }

    async fn handle(&self, mut item: WebhookRetryItem) {
        let wait = item.next_retry_at - Utc::now();
        if let Ok(wait) = wait.to_std() {
            tokio::time::sleep(wait).await;
        }

        let Some(url) = self
            .dispatcher
            .config
            .url_for(item.service_type)
            .map(str::to_string)
        else {
            return;
        };

        if self.dispatcher.post_webhook(&url, &item.payload).await {
            tracing::info!(
                payment_id = %item.payment_id,
                retry_count = item.retry_count,
                "webhook redelivery succeeded"
            );
            return;
        }

        match after_failed_attempt(&item) {
            RetryDecision::Requeue { retry_count, delay } => {
                item.retry_count = retry_count;
                item.next_retry_at = Utc::now() + delay;
                if let Err(err) = self.log_repo.record_retry_failure(&item).await {
                    tracing::warn!("failed to record webhook retry: {}", err);
                }
                // try_send: the worker is also the queue's only consumer, so
                // an awaited send on a full queue would block on itself.
                if let Err(err) = self.requeue.try_send(item) {
                    tracing::error!("webhook retry queue unavailable, dropping item: {}", err);
                }
            }
            RetryDecision::GiveUp => {
                tracing::error!(
                    payment_id = %item.payment_id,
                    service_type = %item.service_type,
                    "webhook failed permanently after {} retries",
                    item.retry_count
                );
                if let Err(err) = self.log_repo.record_permanent_failure(&item).await {
                    tracing::warn!("failed to record permanent webhook failure: {}", err);
                }
            }
        }
    }
}
