pub mod clients;
pub mod config;
pub mod domain {
    pub mod payment;
    pub mod service_type;
}
pub mod error;
pub mod http {
    pub mod handlers {
        pub mod integrations;
    }
}
pub mod integration {
    pub mod api_keys;
    pub mod metadata;
    pub mod rate_limit;
    pub mod router;
}
pub mod repo {
    pub mod payments_repo;
    pub mod refunds_repo;
    pub mod webhook_log_repo;
}
pub mod webhook {
    pub mod dispatcher;
    pub mod retry;
    pub mod signature;
}
pub mod workers {
    pub mod cleanup;
    pub mod reconciliation;
}

#[derive(Clone)]
pub struct AppState {
    pub integration: std::sync::Arc<integration::router::IntegrationService>,
    pub dispatcher: webhook::dispatcher::WebhookDispatcher,
    pub payments_repo: repo::payments_repo::PaymentsRepo,
    pub refunds_repo: repo::refunds_repo::RefundsRepo,
}
