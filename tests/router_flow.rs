use chrono::Utc;
use payment_integration::clients::mock::{MockBehavior, MockServiceClient};
use payment_integration::clients::ClientRegistry;
use payment_integration::domain::payment::{Payment, PaymentStatus, Refund};
use payment_integration::domain::service_type::ServiceType;
use payment_integration::error::IntegrationError;
use payment_integration::integration::api_keys::ApiKeyStore;
use payment_integration::integration::metadata::MetadataValidator;
use payment_integration::integration::rate_limit::{LimitConfig, RateLimiter};
use payment_integration::integration::router::{IntegrationService, ServiceValidationRequest};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn booking_payment_routes_to_booking_client() {
    let (mock, service) = booking_service(MockBehavior::AlwaysValid);
    let mut payment = payment(json!({
        "api_key": "bk-key",
        "booking_id": "b1",
        "user_id": "u1",
        "class_id": "c1",
    }));

    let routed = service
        .process_payment_integration(&mut payment)
        .await
        .expect("booking payment should route");

    assert_eq!(routed, ServiceType::Booking);
    // metadata was standardized in place
    assert_eq!(payment.metadata.get("service_type"), Some(&json!("booking")));
    assert_eq!(
        payment.metadata.get("booking_type"),
        Some(&json!("yoga_class"))
    );

    let calls = mock.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("update:b1:"));
    assert!(calls[0].ends_with(":pending"));
}

#[tokio::test]
async fn wrong_api_key_is_rejected_before_any_client_call() {
    let (mock, service) = booking_service(MockBehavior::AlwaysValid);
    let mut payment = payment(json!({
        "api_key": "wrong-key",
        "booking_id": "b1",
        "user_id": "u1",
        "class_id": "c1",
    }));

    let err = service
        .process_payment_integration(&mut payment)
        .await
        .expect_err("wrong key must be rejected");

    assert!(matches!(err, IntegrationError::Unauthorized));
    assert!(mock.recorded_calls().is_empty());
}

#[tokio::test]
async fn missing_api_key_fails_closed() {
    let (mock, service) = booking_service(MockBehavior::AlwaysValid);
    let mut payment = payment(json!({"booking_id": "b1"}));

    let err = service
        .process_payment_integration(&mut payment)
        .await
        .expect_err("missing key must be rejected");

    assert!(matches!(err, IntegrationError::Unauthorized));
    assert!(mock.recorded_calls().is_empty());
}

#[tokio::test]
async fn rate_limited_service_is_rejected() {
    let (_, mut service) = booking_service(MockBehavior::AlwaysValid);
    service.rate_limiter = RateLimiter::with_limits([(
        "booking".to_string(),
        LimitConfig {
            ceiling: 1,
            window: std::time::Duration::from_secs(60),
        },
    )]);

    let meta = json!({
        "api_key": "bk-key",
        "booking_id": "b1",
        "user_id": "u1",
        "class_id": "c1",
    });

    let mut first = payment(meta.clone());
    service
        .process_payment_integration(&mut first)
        .await
        .expect("first call passes");

    let mut second = payment(meta);
    let err = service
        .process_payment_integration(&mut second)
        .await
        .expect_err("second call is limited");
    assert!(matches!(err, IntegrationError::RateLimited(key) if key == "booking"));
}

#[tokio::test]
async fn unknown_service_type_is_a_routing_error() {
    let (_, service) = booking_service(MockBehavior::AlwaysValid);
    // register a key so the request survives authentication
    service.api_keys.set("unknown", "uk-key");

    let mut payment = payment(json!({"api_key": "uk-key"}));
    let err = service
        .process_payment_integration(&mut payment)
        .await
        .expect_err("unknown type must not dispatch");
    assert!(matches!(err, IntegrationError::UnknownServiceType(_)));
}

#[tokio::test]
async fn missing_correlation_id_is_a_validation_error() {
    let (_, service) = booking_service(MockBehavior::AlwaysValid);
    let mut payment = payment(json!({
        "api_key": "bk-key",
        "payment_type": "booking",
    }));

    let err = service
        .process_payment_integration(&mut payment)
        .await
        .expect_err("no booking_id to dispatch to");
    assert!(matches!(err, IntegrationError::Validation(_)));
}

#[tokio::test]
async fn refund_routes_through_the_same_table_under_its_own_key() {
    let (mock, service) = booking_service(MockBehavior::AlwaysValid);
    let original = payment(json!({"booking_id": "b1"}));
    let refund = refund_for(&original);

    let routed = service
        .process_refund_integration(&refund, &original)
        .await
        .expect("booking refund should route");

    assert_eq!(routed, ServiceType::Booking);
    let calls = mock.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].ends_with(":refunded"));
}

#[tokio::test]
async fn refund_without_a_client_is_handled_generically() {
    let (mock, service) = booking_service(MockBehavior::AlwaysValid);
    let original = payment(json!({"payment_type": "donation"}));
    let refund = refund_for(&original);

    let routed = service
        .process_refund_integration(&refund, &original)
        .await
        .expect("generic refund succeeds");

    assert_eq!(routed, ServiceType::Donation);
    assert!(mock.recorded_calls().is_empty());
}

#[tokio::test]
async fn validation_delegates_to_the_service_client() {
    let (mock, service) = booking_service(MockBehavior::RejectValidation);
    let request = ServiceValidationRequest {
        payment_type: "booking".to_string(),
        service_id: "b1".to_string(),
        amount: 2500,
        currency: "USD".to_string(),
        metadata: json!({"user_id": "u1", "class_id": "c1"}),
    };

    let response = service
        .validate_payment_request(&request)
        .await
        .expect("validation call succeeds");

    assert!(!response.valid);
    assert_eq!(response.message.as_deref(), Some("mock rejection"));
    assert_eq!(mock.recorded_calls(), vec!["validate:b1".to_string()]);
}

#[tokio::test]
async fn validation_accepts_unknown_types_permissively() {
    let (_, service) = booking_service(MockBehavior::AlwaysValid);
    let request = ServiceValidationRequest {
        payment_type: "wallet_topup".to_string(),
        service_id: "w1".to_string(),
        amount: 100,
        currency: "USD".to_string(),
        metadata: json!({"anything": true}),
    };

    let response = service
        .validate_payment_request(&request)
        .await
        .expect("unknown types are accepted");
    assert!(response.valid);
    assert_eq!(response.service_type, ServiceType::Unknown);
}

#[tokio::test]
async fn validation_rejects_bad_metadata_shape() {
    let (mock, service) = booking_service(MockBehavior::AlwaysValid);
    let request = ServiceValidationRequest {
        payment_type: "booking".to_string(),
        service_id: "b1".to_string(),
        amount: 2500,
        currency: "USD".to_string(),
        metadata: json!({"class_id": "c1"}), // user_id missing
    };

    let err = service
        .validate_payment_request(&request)
        .await
        .expect_err("metadata shape is invalid");
    assert!(matches!(err, IntegrationError::Validation(_)));
    assert!(mock.recorded_calls().is_empty());
}

fn booking_service(behavior: MockBehavior) -> (Arc<MockServiceClient>, IntegrationService) {
    let mock = Arc::new(MockServiceClient::new("booking", behavior));
    let api_keys = Arc::new(ApiKeyStore::new());
    api_keys.set("booking", "bk-key");

    let service = IntegrationService {
        metadata_validator: MetadataValidator::new(),
        rate_limiter: RateLimiter::new(),
        api_keys,
        clients: ClientRegistry::new().register(ServiceType::Booking, mock.clone()),
    };
    (mock, service)
}

fn payment(metadata: serde_json::Value) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        amount_minor: 2500,
        currency: "USD".to_string(),
        gateway: "stripe".to_string(),
        gateway_payment_id: None,
        status: PaymentStatus::Pending,
        metadata: metadata.as_object().cloned().unwrap(),
        created_at: Utc::now(),
        paid_at: None,
    }
}

fn refund_for(original: &Payment) -> Refund {
    Refund {
        id: Uuid::new_v4(),
        payment_id: original.id,
        amount_minor: original.amount_minor,
        status: PaymentStatus::Refunded,
        created_at: Utc::now(),
        processed_at: None,
    }
}
