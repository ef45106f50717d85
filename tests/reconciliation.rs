use payment_integration::domain::payment::PaymentStatus;
use payment_integration::workers::reconciliation::reconciled_status;

#[test]
fn stuck_processing_payment_adopts_the_downstream_view() {
    // a booking confirmed downstream maps to a paid payment locally
    let downstream = PaymentStatus::from_service_status("confirmed").unwrap();
    assert_eq!(downstream, PaymentStatus::Paid);

    let corrected = reconciled_status(&PaymentStatus::Processing, &downstream);
    assert_eq!(corrected, Some(PaymentStatus::Paid));
}

#[test]
fn pending_payment_can_move_to_failed() {
    let downstream = PaymentStatus::from_service_status("cancelled").unwrap();
    let corrected = reconciled_status(&PaymentStatus::Pending, &downstream);
    assert_eq!(corrected, Some(PaymentStatus::Failed));
}

#[test]
fn terminal_states_never_regress() {
    for local in [
        PaymentStatus::Paid,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
    ] {
        assert_eq!(reconciled_status(&local, &PaymentStatus::Pending), None);
        assert_eq!(reconciled_status(&local, &PaymentStatus::Processing), None);
    }
}

#[test]
fn matching_views_need_no_correction() {
    assert_eq!(
        reconciled_status(&PaymentStatus::Processing, &PaymentStatus::Processing),
        None
    );
}

#[test]
fn downstream_status_vocabulary_maps_onto_the_local_lifecycle() {
    for (reported, expected) in [
        ("paid", PaymentStatus::Paid),
        ("succeeded", PaymentStatus::Paid),
        ("completed", PaymentStatus::Paid),
        ("reserved", PaymentStatus::Pending),
        ("processing", PaymentStatus::Processing),
        ("failed", PaymentStatus::Failed),
        ("refunded", PaymentStatus::Refunded),
    ] {
        assert_eq!(
            PaymentStatus::from_service_status(reported),
            Some(expected),
            "mapping for {reported}"
        );
    }

    assert_eq!(PaymentStatus::from_service_status("on_hold"), None);
}
