use crate::clients::ClientRegistry;
use crate::domain::payment::PaymentStatus;
use crate::domain::service_type::ServiceType;
use crate::repo::payments_repo::PaymentsRepo;
use anyhow::Result;
use chrono::{Duration, Utc};

const RECONCILE_BATCH: i64 = 500;

// None means leave the payment alone; terminal statuses never regress.
pub fn reconciled_status(
    local: &PaymentStatus,
    downstream: &PaymentStatus,
) -> Option<PaymentStatus> {
    if local.is_terminal() || local == downstream {
        return None;
    }
    Some(downstream.clone())
}

pub struct ReconciliationWorker {
    pub payments_repo: PaymentsRepo,
    pub clients: ClientRegistry,
    pub interval: std::time::Duration,
    pub stale_after: Duration,
}

impl ReconciliationWorker {
    pub fn new(payments_repo: PaymentsRepo, clients: ClientRegistry) -> Self {
        Self {
            payments_repo,
            clients,
            interval: std::time::Duration::from_secs(3600),
            stale_after: Duration::hours(1),
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The immediate first tick would reconcile on boot; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match self.reconcile_payments().await {
                Ok(count) => {
                    tracing::info!("payment reconciliation completed, processed {}", count)
                }
                Err(err) => tracing::error!("payment reconciliation failed: {}", err),
            }
        }
    }

    pub async fn reconcile_payments(&self) -> Result<usize> {
        let cutoff = Utc::now() - self.stale_after;
        let payments = self
            .payments_repo
            .due_for_reconciliation(cutoff, RECONCILE_BATCH)
            .await?;
        let count = payments.len();

        for payment in payments {
            let service_type = ServiceType::infer(&payment.metadata);
            let Some(client) = self.clients.get(service_type) else {
                continue;
            };
            let Some(service_id) = service_type.service_id(&payment.metadata) else {
                continue;
            };

            let reported = match client.fetch_payment_status(&service_id).await {
                Ok(status) => status,
                Err(err) => {
                    tracing::warn!(
                        payment_id = %payment.id,
                        service_type = %service_type,
                        "skipping reconciliation: {}",
                        err
                    );
                    continue;
                }
            };

            let Some(downstream) = PaymentStatus::from_service_status(&reported) else {
                tracing::warn!(
                    payment_id = %payment.id,
                    "skipping reconciliation: unrecognized downstream status {:?}",
                    reported
                );
                continue;
            };

            if let Some(corrected) = reconciled_status(&payment.status, &downstream) {
                if let Err(err) = self.payments_repo.update_status(payment.id, &corrected).await {
                    tracing::warn!(payment_id = %payment.id, "failed to persist reconciled status: {}", err);
                    continue;
                }
                tracing::info!(
                    payment_id = %payment.id,
                    "reconciled payment: {} -> {}",
                    payment.status.as_str(),
                    corrected.as_str()
                );
            }
        }

        Ok(count)
    }
}
