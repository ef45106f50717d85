use payment_integration::domain::service_type::ServiceType;
use serde_json::{json, Map, Value};

#[test]
fn explicit_payment_type_wins_over_correlation_ids() {
    let meta = object(json!({
        "payment_type": "subscription",
        "booking_id": "b1",
        "order_id": "o1",
    }));
    assert_eq!(ServiceType::infer(&meta), ServiceType::Subscription);
}

#[test]
fn correlation_id_precedence_is_booking_order_session_subscription() {
    let meta = object(json!({"booking_id": "b1", "order_id": "o1"}));
    assert_eq!(ServiceType::infer(&meta), ServiceType::Booking);

    let meta = object(json!({"order_id": "o1", "session_id": "s1"}));
    assert_eq!(ServiceType::infer(&meta), ServiceType::Ecommerce);

    let meta = object(json!({"session_id": "s1", "subscription_id": "sub1"}));
    assert_eq!(ServiceType::infer(&meta), ServiceType::Live);

    let meta = object(json!({"subscription_id": "sub1"}));
    assert_eq!(ServiceType::infer(&meta), ServiceType::Subscription);
}

#[test]
fn empty_correlation_ids_do_not_match() {
    let meta = object(json!({"booking_id": "", "order_id": "o1"}));
    assert_eq!(ServiceType::infer(&meta), ServiceType::Ecommerce);
}

#[test]
fn no_signal_means_unknown() {
    assert_eq!(ServiceType::infer(&Map::new()), ServiceType::Unknown);
}

#[test]
fn unrecognized_explicit_type_is_unknown() {
    let meta = object(json!({"payment_type": "wallet_topup"}));
    assert_eq!(ServiceType::infer(&meta), ServiceType::Unknown);
}

#[test]
fn service_id_reads_the_matching_field() {
    let meta = object(json!({"booking_id": "b1"}));
    assert_eq!(
        ServiceType::Booking.service_id(&meta),
        Some("b1".to_string())
    );
    assert_eq!(ServiceType::Ecommerce.service_id(&meta), None);
    assert_eq!(ServiceType::Donation.service_id(&meta), None);
}

#[test]
fn refund_keys_are_type_scoped() {
    assert_eq!(ServiceType::Booking.refund_key(), "booking_refund");
    assert_eq!(ServiceType::Ecommerce.refund_key(), "ecommerce_refund");
}

fn object(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}
