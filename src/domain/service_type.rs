use crate::domain::payment::Metadata;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Booking,
    Ecommerce,
    Live,
    Subscription,
    Donation,
    Unknown,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Booking => "booking",
            ServiceType::Ecommerce => "ecommerce",
            ServiceType::Live => "live",
            ServiceType::Subscription => "subscription",
            ServiceType::Donation => "donation",
            ServiceType::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> ServiceType {
        match s {
            "booking" => ServiceType::Booking,
            "ecommerce" => ServiceType::Ecommerce,
            "live" => ServiceType::Live,
            "subscription" => ServiceType::Subscription,
            "donation" => ServiceType::Donation,
            _ => ServiceType::Unknown,
        }
    }

    // an explicit payment_type wins, then the first populated correlation id
    pub fn infer(metadata: &Metadata) -> ServiceType {
        if let Some(explicit) = metadata.get("payment_type").and_then(|v| v.as_str()) {
            return ServiceType::parse(explicit);
        }
        if has_id(metadata, "booking_id") {
            return ServiceType::Booking;
        }
        if has_id(metadata, "order_id") {
            return ServiceType::Ecommerce;
        }
        if has_id(metadata, "session_id") {
            return ServiceType::Live;
        }
        if has_id(metadata, "subscription_id") {
            return ServiceType::Subscription;
        }
        ServiceType::Unknown
    }

    pub fn service_id(&self, metadata: &Metadata) -> Option<String> {
        let field = match self {
            ServiceType::Booking => "booking_id",
            ServiceType::Ecommerce => "order_id",
            ServiceType::Live => "session_id",
            ServiceType::Subscription => "subscription_id",
            ServiceType::Donation | ServiceType::Unknown => return None,
        };
        metadata
            .get(field)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn refund_key(&self) -> String {
        format!("{}_refund", self.as_str())
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn has_id(metadata: &Metadata, field: &str) -> bool {
    metadata
        .get(field)
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty())
}
