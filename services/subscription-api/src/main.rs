//! Vitrina Subscription API
//!
//! Subscription lifecycle microservice: payment registration, batch
//! reconciliation, status projection, and the public storefront gate.
//!
//! ## Admin Endpoints
//!
//! - `POST /api/v1/subscription/payments` - Register a payment
//! - `GET /api/v1/subscription/{id}/status` - Subscription status projection
//! - `GET /api/v1/subscription/{id}/payments` - Payment ledger history
//! - `PUT /api/v1/subscription/reconcile` - Trigger a reconciliation run
//!
//! ## Public Endpoints
//!
//! - `GET /public/stores/{id}/availability` - Storefront access gate
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

mod config;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use vitrina_db::pg::Repositories;

use crate::config::Config;
use crate::handlers::{health, ready};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("subscription_api=debug".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vitrina Subscription API");

    let config = Config::from_env()?;
    tracing::info!(http_port = config.http_port, "Configuration loaded");

    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    let pool = vitrina_db::create_pool(&config.database_url).await?;
    tracing::info!("Connected to the subscriber database");

    let repos = Repositories::new(pool.clone());
    let state = AppState::new(repos, pool, config.clone());

    let app = build_router(state, metrics_handle);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, addr).await?;

    tracing::info!("Subscription API stopped");
    Ok(())
}

fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();

    // Admin surface
    let api_v1 = Router::new()
        .route("/subscription/payments", post(handlers::register_payment))
        .route("/subscription/{id}/status", get(handlers::subscription_status))
        .route("/subscription/{id}/payments", get(handlers::payment_history))
        .route("/subscription/reconcile", put(handlers::trigger_reconciliation));

    // Storefront gate; read-only and hit on every public page load
    let public_routes = Router::new().route(
        "/public/stores/{id}/availability",
        get(handlers::store_availability),
    );

    // Probes sit outside the timeout layer
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let middleware = ServiceBuilder::new()
        // Outermost: request ids, so every trace line below carries one
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(public_routes)
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!(%addr, "Subscription API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Latency buckets optimized for subscription operations; the access
    // gate sits on the public request path and should stay well under 50ms
    let latency_buckets = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.2, 0.5, 1.0, 2.5];

    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            latency_buckets,
        )?
        .set_buckets_for_metric(
            Matcher::Full("subscription_operation_duration_seconds".to_string()),
            latency_buckets,
        )?;

    let handle = builder.install_recorder()?;

    metrics::describe_counter!(
        "subscription_payments_registered_total",
        "Total payments registered"
    );
    metrics::describe_counter!(
        "subscription_reconcile_runs_total",
        "Total reconciliation runs triggered via the API"
    );
    metrics::describe_counter!(
        "subscription_transitions_total",
        "Total lifecycle transitions by resulting state"
    );
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds"
    );
    metrics::describe_histogram!(
        "subscription_operation_duration_seconds",
        "Subscription operation latency in seconds by operation type"
    );

    Ok(handle)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests");
}
