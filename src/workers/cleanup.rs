use crate::repo::webhook_log_repo::WebhookLogRepo;
use anyhow::Result;
use chrono::{Duration, Utc};

pub struct CleanupWorker {
    pub webhook_log_repo: WebhookLogRepo,
    pub interval: std::time::Duration,
    pub retention: Duration,
}

impl CleanupWorker {
    pub fn new(webhook_log_repo: WebhookLogRepo) -> Self {
        Self {
            webhook_log_repo,
            interval: std::time::Duration::from_secs(24 * 3600),
            retention: Duration::days(30),
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                tracing::error!("cleanup pass failed: {}", err);
            }
        }
    }

    async fn tick(&self) -> Result<()> {
        let cutoff = Utc::now() - self.retention;
        let purged = self.webhook_log_repo.purge_older_than(cutoff).await?;
        tracing::info!("cleanup purged {} webhook log rows", purged);
        Ok(())
    }
}
