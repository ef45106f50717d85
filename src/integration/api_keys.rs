use std::collections::HashMap;
use std::sync::RwLock;
use subtle::ConstantTimeEq;

pub const WEBHOOK_SECRET_KEY: &str = "webhook_secret";

pub struct ApiKeyStore {
    keys: RwLock<HashMap<String, String>>,
}

impl Default for ApiKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiKeyStore {
    pub fn new() -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_env() -> Self {
        let store = Self::new();
        for (service, var) in [
            ("booking", "BOOKING_SERVICE_API_KEY"),
            ("ecommerce", "ECOMMERCE_SERVICE_API_KEY"),
            ("live", "LIVE_SERVICE_API_KEY"),
            ("subscription", "SUBSCRIPTION_SERVICE_API_KEY"),
            (WEBHOOK_SECRET_KEY, "WEBHOOK_SHARED_SECRET"),
        ] {
            if let Ok(key) = std::env::var(var) {
                store.set(service, &key);
            }
        }
        store
    }

    pub fn get(&self, service: &str) -> Option<String> {
        let keys = match self.keys.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        keys.get(service).cloned()
    }

    pub fn set(&self, service: &str, key: &str) {
        let mut keys = match self.keys.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        keys.insert(service.to_string(), key.to_string());
    }

    // fails closed when no key is registered
    pub fn verify(&self, service: &str, presented: &str) -> bool {
        let Some(expected) = self.get(service) else {
            return false;
        };
        if expected.is_empty() {
            return false;
        }
        expected.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}
