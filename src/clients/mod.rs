use crate::domain::payment::{Metadata, PaymentStatus};
use crate::domain::service_type::ServiceType;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub mod booking;
pub mod ecommerce;
pub mod live;
pub mod mock;
pub mod subscription;

#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub reason: Option<String>,
    pub details: Metadata,
}

impl ValidationOutcome {
    pub fn ok(details: Metadata) -> Self {
        Self {
            valid: true,
            reason: None,
            details,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            details: Metadata::new(),
        }
    }
}

#[async_trait::async_trait]
pub trait ServiceClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn validate_payment(
        &self,
        service_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ValidationOutcome>;

    async fn fetch_payment_status(&self, service_id: &str) -> Result<String>;

    async fn update_payment_status(
        &self,
        service_id: &str,
        payment_id: Uuid,
        status: &PaymentStatus,
    ) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: HashMap<ServiceType, Arc<dyn ServiceClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, service_type: ServiceType, client: Arc<dyn ServiceClient>) -> Self {
        self.clients.insert(service_type, client);
        self
    }

    pub fn get(&self, service_type: ServiceType) -> Option<Arc<dyn ServiceClient>> {
        self.clients.get(&service_type).cloned()
    }
}
