use crate::clients::ClientRegistry;
use crate::domain::payment::{Metadata, Payment, Refund};
use crate::domain::service_type::ServiceType;
use crate::error::IntegrationError;
use crate::integration::api_keys::ApiKeyStore;
use crate::integration::metadata::MetadataValidator;
use crate::integration::rate_limit::RateLimiter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub struct IntegrationService {
    pub metadata_validator: MetadataValidator,
    pub rate_limiter: RateLimiter,
    pub api_keys: Arc<ApiKeyStore>,
    pub clients: ClientRegistry,
}

#[derive(Debug, Deserialize)]
pub struct ServiceValidationRequest {
    #[serde(rename = "type")]
    pub payment_type: String,
    pub service_id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Serialize)]
pub struct ServiceValidationResponse {
    pub valid: bool,
    pub service_type: ServiceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub details: Metadata,
}

impl IntegrationService {
    pub async fn process_payment_integration(
        &self,
        payment: &mut Payment,
    ) -> Result<ServiceType, IntegrationError> {
        let service_type = ServiceType::infer(&payment.metadata);

        if !self.authenticate(service_type, &payment.metadata) {
            tracing::warn!(
                payment_id = %payment.id,
                service_type = %service_type,
                "rejected payment integration: api key mismatch"
            );
            return Err(IntegrationError::Unauthorized);
        }

        if self.rate_limiter.is_limited(service_type.as_str()) {
            return Err(IntegrationError::RateLimited(
                service_type.as_str().to_string(),
            ));
        }

        payment.metadata = self
            .metadata_validator
            .standardize(&payment.metadata, service_type);

        tracing::info!(
            payment_id = %payment.id,
            service_type = %service_type,
            "processing payment integration"
        );

        self.dispatch(service_type, payment).await?;
        Ok(service_type)
    }

    pub async fn process_refund_integration(
        &self,
        refund: &Refund,
        original_payment: &Payment,
    ) -> Result<ServiceType, IntegrationError> {
        let service_type = ServiceType::infer(&original_payment.metadata);

        if self.rate_limiter.is_limited(&service_type.refund_key()) {
            return Err(IntegrationError::RateLimited(service_type.refund_key()));
        }

        let Some(client) = self.clients.get(service_type) else {
            tracing::info!(
                refund_id = %refund.id,
                service_type = %service_type,
                "processing generic refund"
            );
            return Ok(service_type);
        };

        let service_id = service_type
            .service_id(&original_payment.metadata)
            .ok_or_else(|| {
                IntegrationError::Validation(format!("missing {service_type} correlation id"))
            })?;

        client
            .update_payment_status(&service_id, refund.payment_id, &refund.status)
            .await?;
        Ok(service_type)
    }

    // Unknown service types validate permissively so novel integrations
    // are not blocked.
    pub async fn validate_payment_request(
        &self,
        request: &ServiceValidationRequest,
    ) -> Result<ServiceValidationResponse, IntegrationError> {
        let service_type = ServiceType::parse(&request.payment_type);

        if !self
            .metadata_validator
            .validate(&request.metadata, service_type)
        {
            return Err(IntegrationError::Validation(
                "invalid metadata structure".to_string(),
            ));
        }

        let Some(client) = self.clients.get(service_type) else {
            return Ok(ServiceValidationResponse {
                valid: true,
                service_type,
                message: None,
                details: Metadata::new(),
            });
        };

        let outcome = client
            .validate_payment(&request.service_id, request.amount, &request.currency)
            .await?;

        Ok(ServiceValidationResponse {
            valid: outcome.valid,
            service_type,
            message: outcome.reason,
            details: outcome.details,
        })
    }

    fn authenticate(&self, service_type: ServiceType, metadata: &Metadata) -> bool {
        let Some(presented) = metadata.get("api_key").and_then(|v| v.as_str()) else {
            return false;
        };
        self.api_keys.verify(service_type.as_str(), presented)
    }

    async fn dispatch(
        &self,
        service_type: ServiceType,
        payment: &Payment,
    ) -> Result<(), IntegrationError> {
        if service_type == ServiceType::Unknown {
            return Err(IntegrationError::UnknownServiceType(
                service_type.as_str().to_string(),
            ));
        }

        let Some(client) = self.clients.get(service_type) else {
            if service_type == ServiceType::Donation {
                // Donations have no downstream service to notify.
                tracing::info!(payment_id = %payment.id, "handling donation payment");
                return Ok(());
            }
            return Err(IntegrationError::UnknownServiceType(
                service_type.as_str().to_string(),
            ));
        };

        let service_id = service_type.service_id(&payment.metadata).ok_or_else(|| {
            IntegrationError::Validation(format!("missing {service_type} correlation id"))
        })?;

        client
            .update_payment_status(&service_id, payment.id, &payment.status)
            .await?;
        Ok(())
    }
}
