use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct LimitConfig {
    pub ceiling: u32,
    pub window: Duration,
}

#[derive(Debug)]
struct WindowState {
    config: LimitConfig,
    window_start: Option<Instant>,
    count: u32,
}

// Fixed window: the count resets to 1 on rollover, so the first call of a
// fresh window is never limited.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, WindowState>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        let minute = Duration::from_secs(60);
        Self::with_limits(
            [
                ("booking", 100),
                ("ecommerce", 200),
                ("live", 50),
                ("subscription", 30),
                ("booking_refund", 100),
                ("ecommerce_refund", 200),
                ("live_refund", 50),
                ("subscription_refund", 30),
            ]
            .into_iter()
            .map(|(key, ceiling)| {
                (
                    key.to_string(),
                    LimitConfig {
                        ceiling,
                        window: minute,
                    },
                )
            }),
        )
    }

    pub fn with_limits(limits: impl IntoIterator<Item = (String, LimitConfig)>) -> Self {
        let windows = limits
            .into_iter()
            .map(|(key, config)| {
                (
                    key,
                    WindowState {
                        config,
                        window_start: None,
                        count: 0,
                    },
                )
            })
            .collect();
        Self {
            windows: Mutex::new(windows),
        }
    }

    pub fn is_limited(&self, key: &str) -> bool {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(state) = windows.get_mut(key) else {
            return false;
        };

        let now = Instant::now();
        let expired = state
            .window_start
            .map(|started| now.duration_since(started) > state.config.window)
            .unwrap_or(true);

        if expired {
            state.window_start = Some(now);
            state.count = 1;
            return false;
        }

        state.count += 1;
        state.count > state.config.ceiling
    }
}
