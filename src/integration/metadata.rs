use crate::domain::payment::Metadata;
use crate::domain::service_type::ServiceType;
use serde_json::Value;
use std::collections::HashMap;

pub const METADATA_SCHEMA_VERSION: &str = "1.0";

pub struct MetadataValidator {
    allowed_fields: HashMap<ServiceType, Vec<&'static str>>,
    required_fields: HashMap<ServiceType, Vec<&'static str>>,
}

impl Default for MetadataValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataValidator {
    pub fn new() -> Self {
        let mut allowed_fields = HashMap::new();
        allowed_fields.insert(
            ServiceType::Booking,
            vec![
                "user_id",
                "class_id",
                "instructor_id",
                "start_time",
                "end_time",
                "participants",
            ],
        );
        allowed_fields.insert(
            ServiceType::Ecommerce,
            vec![
                "user_id",
                "items",
                "shipping_address",
                "billing_address",
                "discount_code",
            ],
        );
        allowed_fields.insert(
            ServiceType::Live,
            vec![
                "user_id",
                "session_id",
                "session_title",
                "instructor_id",
                "start_time",
                "duration",
            ],
        );
        allowed_fields.insert(
            ServiceType::Subscription,
            vec![
                "user_id",
                "plan_id",
                "interval",
                "trial_end",
                "cancel_at_period_end",
            ],
        );

        let mut required_fields = HashMap::new();
        required_fields.insert(ServiceType::Booking, vec!["user_id", "class_id"]);
        required_fields.insert(ServiceType::Ecommerce, vec!["user_id", "items"]);
        required_fields.insert(ServiceType::Live, vec!["user_id", "session_id"]);
        required_fields.insert(ServiceType::Subscription, vec!["user_id", "plan_id"]);

        Self {
            allowed_fields,
            required_fields,
        }
    }

    pub fn validate(&self, metadata: &Value, service_type: ServiceType) -> bool {
        let Some(meta) = metadata.as_object() else {
            return false;
        };

        if let Some(required) = self.required_fields.get(&service_type) {
            for field in required {
                if !meta.contains_key(*field) {
                    return false;
                }
            }
        }

        if let Some(allowed) = self.allowed_fields.get(&service_type) {
            for field in meta.keys() {
                if !allowed.iter().any(|a| *a == field.as_str()) && !field.starts_with("custom_") {
                    return false;
                }
            }
        }

        true
    }

    // idempotent apart from the standardized_at timestamp
    pub fn standardize(&self, metadata: &Metadata, service_type: ServiceType) -> Metadata {
        let mut standardized = metadata.clone();

        standardized.insert(
            "service_type".to_string(),
            Value::String(service_type.as_str().to_string()),
        );
        standardized.insert(
            "standardized_at".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        standardized.insert(
            "version".to_string(),
            Value::String(METADATA_SCHEMA_VERSION.to_string()),
        );

        let derived = match service_type {
            ServiceType::Booking => Some(("booking_type", "yoga_class")),
            ServiceType::Ecommerce => Some(("order_type", "product_purchase")),
            ServiceType::Live => Some(("session_type", "live_streaming")),
            ServiceType::Subscription => Some(("subscription_type", "recurring")),
            ServiceType::Donation | ServiceType::Unknown => None,
        };
        if let Some((key, value)) = derived {
            standardized.insert(key.to_string(), Value::String(value.to_string()));
        }

        standardized
    }
}
