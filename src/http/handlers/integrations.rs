use crate::domain::payment::{ErrorEnvelope, ErrorPayload, Payment, PaymentStatus, Refund};
use crate::domain::service_type::ServiceType;
use crate::error::IntegrationError;
use crate::integration::router::{ServiceValidationRequest, ServiceValidationResponse};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct IntegrationResponse {
    pub payment_id: Uuid,
    pub status: PaymentStatus,
    pub service_type: ServiceType,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn process_payment(
    State(state): State<AppState>,
    Json(mut payment): Json<Payment>,
) -> Result<Json<IntegrationResponse>, (StatusCode, Json<ErrorEnvelope>)> {
    let service_type = state
        .integration
        .process_payment_integration(&mut payment)
        .await
        .map_err(reject)?;

    state
        .payments_repo
        .upsert(&payment)
        .await
        .map_err(internal)?;

    // fire-and-forget, a slow downstream must not block the caller
    if let Some(service_id) = service_type.service_id(&payment.metadata) {
        let dispatcher = state.dispatcher.clone();
        let payment_snapshot = payment.clone();
        tokio::spawn(async move {
            dispatcher
                .notify(&payment_snapshot, service_type, &service_id)
                .await;
        });
    }

    Ok(Json(IntegrationResponse {
        payment_id: payment.id,
        status: payment.status,
        service_type,
    }))
}

pub async fn process_refund(
    State(state): State<AppState>,
    Json(refund): Json<Refund>,
) -> Result<Json<IntegrationResponse>, (StatusCode, Json<ErrorEnvelope>)> {
    let Some(original) = state
        .payments_repo
        .find_by_id(refund.payment_id)
        .await
        .map_err(internal)?
    else {
        return Err((
            StatusCode::NOT_FOUND,
            envelope("PAYMENT_NOT_FOUND", "original payment not found"),
        ));
    };

    state.refunds_repo.insert(&refund).await.map_err(internal)?;

    let service_type = state
        .integration
        .process_refund_integration(&refund, &original)
        .await
        .map_err(reject)?;

    if refund.status.is_terminal() {
        state
            .refunds_repo
            .mark_processed(refund.id, &refund.status)
            .await
            .map_err(internal)?;
    }

    Ok(Json(IntegrationResponse {
        payment_id: refund.payment_id,
        status: refund.status,
        service_type,
    }))
}

pub async fn validate_payment(
    State(state): State<AppState>,
    Json(request): Json<ServiceValidationRequest>,
) -> Result<Json<ServiceValidationResponse>, (StatusCode, Json<ErrorEnvelope>)> {
    let response = state
        .integration
        .validate_payment_request(&request)
        .await
        .map_err(reject)?;
    Ok(Json(response))
}

fn reject(err: IntegrationError) -> (StatusCode, Json<ErrorEnvelope>) {
    let status = match &err {
        IntegrationError::Validation(_) => StatusCode::BAD_REQUEST,
        IntegrationError::Unauthorized => StatusCode::UNAUTHORIZED,
        IntegrationError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        IntegrationError::UnknownServiceType(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IntegrationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, envelope(err.code(), &err.to_string()))
}

fn internal(err: anyhow::Error) -> (StatusCode, Json<ErrorEnvelope>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        envelope("INTERNAL_ERROR", &err.to_string()),
    )
}

fn envelope(code: &str, message: &str) -> Json<ErrorEnvelope> {
    Json(ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
        },
    })
}
