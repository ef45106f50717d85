use crate::clients::{ServiceClient, ValidationOutcome};
use crate::domain::payment::PaymentStatus;
use anyhow::{anyhow, Result};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    AlwaysValid,
    RejectValidation,
    TransportError,
}

pub struct MockServiceClient {
    pub service_name: &'static str,
    pub behavior: MockBehavior,
    pub reported_status: String,
    pub calls: Mutex<Vec<String>>,
}

impl MockServiceClient {
    pub fn new(service_name: &'static str, behavior: MockBehavior) -> Self {
        Self {
            service_name,
            behavior,
            reported_status: "pending".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn reporting(mut self, status: &str) -> Self {
        self.reported_status = status.to_string();
        self
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, call: String) {
        match self.calls.lock() {
            Ok(mut guard) => guard.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }
}

#[async_trait::async_trait]
impl ServiceClient for MockServiceClient {
    fn name(&self) -> &'static str {
        self.service_name
    }

    async fn validate_payment(
        &self,
        service_id: &str,
        _amount_minor: i64,
        _currency: &str,
    ) -> Result<ValidationOutcome> {
        self.record(format!("validate:{service_id}"));
        match self.behavior {
            MockBehavior::AlwaysValid => Ok(ValidationOutcome::ok(serde_json::Map::new())),
            MockBehavior::RejectValidation => Ok(ValidationOutcome::rejected("mock rejection")),
            MockBehavior::TransportError => Err(anyhow!("mock transport error")),
        }
    }

    async fn fetch_payment_status(&self, service_id: &str) -> Result<String> {
        self.record(format!("status:{service_id}"));
        match self.behavior {
            MockBehavior::TransportError => Err(anyhow!("mock transport error")),
            _ => Ok(self.reported_status.clone()),
        }
    }

    async fn update_payment_status(
        &self,
        service_id: &str,
        payment_id: Uuid,
        status: &PaymentStatus,
    ) -> Result<()> {
        self.record(format!(
            "update:{service_id}:{payment_id}:{}",
            status.as_str()
        ));
        match self.behavior {
            MockBehavior::TransportError => Err(anyhow!("mock transport error")),
            _ => Ok(()),
        }
    }
}
