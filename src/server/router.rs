//! Server initialization and routing
//!
//! - Router configuration with all API endpoints
//! - Middleware stack (request id, logging, CORS, body limit)
//! - Graceful shutdown handling

use super::config::ServerConfig;
use super::middleware::{log_requests, request_id};
use super::routes::{health, not_found, predict, welcome};
use super::state::ServerState;
use crate::registry::ModelRegistry;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack, outermost first:
/// 1. HTTP tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS
/// 5. Body size limit
///
/// There is no request timeout: a slow inference holds its request until the
/// model returns.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let mut router = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/predict", post(predict::predict_image))
        .route("/predict_sentiment", post(predict::predict_review_sentiment))
        .route("/recommend_food", post(predict::recommend));

    if state.metrics.is_some() {
        router = router.route("/metrics", get(health::metrics));
    }

    router
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when `origins` is empty; otherwise exactly the listed origins,
/// with credentials and the requested methods/headers allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Install the global tracing subscriber.
pub fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the models and start the HTTP server
///
/// Initializes logging, loads every artifact from the configured model
/// directory (exiting with the error if any is missing), then serves until
/// SIGTERM or Ctrl+C.
///
/// ```rust,no_run
/// use foodai::server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     foodai::server::start_server(config).await
/// }
/// ```
#[cfg(feature = "onnx")]
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config);

    let model_dir = config.model_dir();
    tracing::info!(dir = %model_dir.display(), "Loading model artifacts");
    let registry = ModelRegistry::load(&model_dir)?;

    serve(config, Arc::new(registry)).await
}

/// Serve an already loaded registry
///
/// Callers are expected to have installed a tracing subscriber.
pub async fn serve(config: ServerConfig, registry: Arc<ModelRegistry>) -> anyhow::Result<()> {
    let addr: SocketAddr = config.socket_addr()?;

    let mut state = ServerState::new(config.clone(), registry);
    if config.metrics_enabled {
        let handle = PrometheusBuilder::new().install_recorder()?;
        state = state.with_metrics(handle);
    }

    let app = build_router(Arc::new(state));

    tracing::info!("Starting Food AI server on {}", addr);
    tracing::info!("Max body: {}MB", config.max_body_size_mb);
    tracing::info!(
        "CORS origins: {}, Metrics: {}",
        if config.cors_origins.is_empty() {
            "*".to_string()
        } else {
            config.cors_origins.join(",")
        },
        config.metrics_enabled
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
