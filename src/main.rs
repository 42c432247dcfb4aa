use std::sync::Arc;

use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use link_preview_card::config::Config;
use link_preview_card::handlers;
use link_preview_card::i18n::Strings;
use link_preview_card::metadata::HttpMetadataClient;
use link_preview_card::registry::{register_components, ComponentRegistry};
use link_preview_card::state::AppState;
use link_preview_card::store::CardStore;

#[tokio::main]
async fn main() {
    // JSON logs in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("link_preview_card=info,tower_http=info"));

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Link preview card host starting...");

    let config = Config::from_env().expect("Failed to load configuration");
    info!(
        endpoint = %config.metadata_endpoint,
        relay = config.cors_relay.as_deref().unwrap_or("none"),
        policy = ?config.loading_policy,
        "Configuration loaded"
    );

    // Component tags are defined exactly once, here.
    let registry = ComponentRegistry::new();
    register_components(&registry).expect("Failed to register components");

    let strings = match &config.locales_dir {
        Some(dir) => Strings::load(dir, &config.locale).expect("Failed to load locale strings"),
        None => Strings::default(),
    };
    info!(locale = strings.locale(), "Strings loaded");

    let metadata = HttpMetadataClient::new(
        config.metadata_endpoint.clone(),
        config.cors_relay.clone(),
        config.fetch_timeout,
    )
    .expect("Failed to build metadata client");

    // CORS: permissive in dev so host pages on other origins can embed cards.
    let cors = if config.is_dev {
        info!("CORS: permissive (dev mode)");
        CorsLayer::permissive()
    } else {
        tracing::warn!("CORS: restrictive (production mode)");
        CorsLayer::new()
    };

    let app_state = AppState {
        cards: CardStore::new(),
        registry: Arc::new(registry),
        metadata: Arc::new(metadata),
        strings: Arc::new(strings),
        loading_policy: config.loading_policy,
        default_web_link: Arc::from(config.default_web_link.as_str()),
    };

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = handlers::routes()
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let addr = config.server_addr();
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
