use payment_integration::integration::rate_limit::{LimitConfig, RateLimiter};
use std::time::Duration;

#[test]
fn ceiling_calls_pass_then_next_is_limited() {
    let limiter = limiter_with("svc", 3, Duration::from_secs(60));

    for call in 1..=3 {
        assert!(!limiter.is_limited("svc"), "call {call} should pass");
    }
    assert!(limiter.is_limited("svc"));
    assert!(limiter.is_limited("svc"));
}

#[test]
fn window_rollover_resets_the_counter() {
    let limiter = limiter_with("svc", 2, Duration::from_millis(50));

    assert!(!limiter.is_limited("svc"));
    assert!(!limiter.is_limited("svc"));
    assert!(limiter.is_limited("svc"));

    std::thread::sleep(Duration::from_millis(70));

    // First call of the fresh window is never limited.
    assert!(!limiter.is_limited("svc"));
    assert!(!limiter.is_limited("svc"));
    assert!(limiter.is_limited("svc"));
}

#[test]
fn unconfigured_keys_are_never_limited() {
    let limiter = limiter_with("svc", 1, Duration::from_secs(60));
    for _ in 0..10 {
        assert!(!limiter.is_limited("other"));
    }
}

#[test]
fn keys_have_independent_windows() {
    let limiter = RateLimiter::with_limits([
        (
            "booking".to_string(),
            LimitConfig {
                ceiling: 1,
                window: Duration::from_secs(60),
            },
        ),
        (
            "booking_refund".to_string(),
            LimitConfig {
                ceiling: 1,
                window: Duration::from_secs(60),
            },
        ),
    ]);

    assert!(!limiter.is_limited("booking"));
    assert!(limiter.is_limited("booking"));
    // refund traffic is counted separately
    assert!(!limiter.is_limited("booking_refund"));
}

#[test]
fn default_ecommerce_ceiling_is_200_per_minute() {
    let limiter = RateLimiter::new();
    for call in 1..=200 {
        assert!(!limiter.is_limited("ecommerce"), "call {call} should pass");
    }
    assert!(limiter.is_limited("ecommerce"), "call 201 should be limited");
    assert!(limiter.is_limited("ecommerce"), "call 202 should be limited");
}

fn limiter_with(key: &str, ceiling: u32, window: Duration) -> RateLimiter {
    RateLimiter::with_limits([(key.to_string(), LimitConfig { ceiling, window })])
}
