use axum::routing::{get, post};
use axum::Router;
use payment_integration::clients::booking::BookingClient;
use payment_integration::clients::ecommerce::EcommerceClient;
use payment_integration::clients::live::LiveClient;
use payment_integration::clients::subscription::SubscriptionClient;
use payment_integration::clients::ClientRegistry;
use payment_integration::config::{AppConfig, WebhookConfig};
use payment_integration::domain::service_type::ServiceType;
use payment_integration::integration::api_keys::ApiKeyStore;
use payment_integration::integration::metadata::MetadataValidator;
use payment_integration::integration::rate_limit::RateLimiter;
use payment_integration::integration::router::IntegrationService;
use payment_integration::repo::payments_repo::PaymentsRepo;
use payment_integration::repo::refunds_repo::RefundsRepo;
use payment_integration::repo::webhook_log_repo::WebhookLogRepo;
use payment_integration::webhook::dispatcher::WebhookDispatcher;
use payment_integration::webhook::retry::{WebhookRetryWorker, RETRY_QUEUE_CAPACITY};
use payment_integration::workers::cleanup::CleanupWorker;
use payment_integration::workers::reconciliation::ReconciliationWorker;
use payment_integration::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let refunds_repo = RefundsRepo { pool: pool.clone() };
    let webhook_log_repo = WebhookLogRepo { pool: pool.clone() };

    let api_keys = Arc::new(ApiKeyStore::from_env());
    let http_client = reqwest::Client::new();
    let clients = ClientRegistry::new()
        .register(
            ServiceType::Booking,
            Arc::new(BookingClient {
                base_url: cfg.booking_base_url.clone(),
                api_key: api_keys.get("booking").unwrap_or_default(),
                timeout_ms: cfg.client_timeout_ms,
                client: http_client.clone(),
            }),
        )
        .register(
            ServiceType::Ecommerce,
            Arc::new(EcommerceClient {
                base_url: cfg.ecommerce_base_url.clone(),
                api_key: api_keys.get("ecommerce").unwrap_or_default(),
                timeout_ms: cfg.client_timeout_ms,
                client: http_client.clone(),
            }),
        )
        .register(
            ServiceType::Live,
            Arc::new(LiveClient {
                base_url: cfg.live_base_url.clone(),
                api_key: api_keys.get("live").unwrap_or_default(),
                timeout_ms: cfg.client_timeout_ms,
                client: http_client.clone(),
            }),
        )
        .register(
            ServiceType::Subscription,
            Arc::new(SubscriptionClient {
                base_url: cfg.subscription_base_url.clone(),
                api_key: api_keys.get("subscription").unwrap_or_default(),
                timeout_ms: cfg.client_timeout_ms,
                client: http_client.clone(),
            }),
        );

    let (retry_tx, retry_rx) = tokio::sync::mpsc::channel(RETRY_QUEUE_CAPACITY);
    let dispatcher = WebhookDispatcher {
        config: WebhookConfig::from_env(),
        api_keys: api_keys.clone(),
        client: http_client,
        retry_queue: retry_tx.clone(),
    };

    let retry_worker = WebhookRetryWorker {
        dispatcher: dispatcher.clone(),
        log_repo: Arc::new(webhook_log_repo.clone()),
        queue: retry_rx,
        requeue: retry_tx,
    };
    tokio::spawn(retry_worker.run());

    let reconciliation = ReconciliationWorker::new(payments_repo.clone(), clients.clone());
    tokio::spawn(reconciliation.run());

    let cleanup = CleanupWorker::new(webhook_log_repo);
    tokio::spawn(cleanup.run());

    let integration = Arc::new(IntegrationService {
        metadata_validator: MetadataValidator::new(),
        rate_limiter: RateLimiter::new(),
        api_keys,
        clients,
    });

    let state = AppState {
        integration,
        dispatcher,
        payments_repo,
        refunds_repo,
    };

    let app = Router::new()
        .route(
            "/health",
            get(payment_integration::http::handlers::integrations::health),
        )
        .route(
            "/integrations/payments",
            post(payment_integration::http::handlers::integrations::process_payment),
        )
        .route(
            "/integrations/refunds",
            post(payment_integration::http::handlers::integrations::process_refund),
        )
        .route(
            "/integrations/validate",
            post(payment_integration::http::handlers::integrations::validate_payment),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
