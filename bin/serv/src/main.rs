use std::{fmt::Display, net::SocketAddr};

use anyhow::Context;
use axum::{Router, middleware, routing::get};
use lcr_api::{
    ApiConfig, ApiState,
    metrics::{init_metrics, metrics_handler, track_metrics},
    middleware::{apply_rate_limit, apply_security_headers, create_cors_layer, request_id_middleware},
    tracing::init_tracing,
};
use tokio::signal;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    init_tracing(config.env);
    let metrics_handle = init_metrics()?;

    let pool = lcr_db::create_pool(&config.database_url, config.database_max_connections).await?;
    lcr_db::ensure_db_and_migrate(&config.database_url, &pool)
        .await
        .context("failed to run migrations")?;

    let state = ApiState::new(&config, pool)?;
    let environment = state.environment;

    let api = lcr_api::router::router().with_state(state);
    let api = apply_rate_limit(api, config.rate_limit_per_second, config.rate_limit_burst)?;

    // Scraped from inside the cluster, so not rate limited
    let metrics = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    let app = apply_security_headers(api.merge(metrics), environment)
        .layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(create_cors_layer(&config.allowed_origins));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, env = ?environment, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = wait_for_signal("Ctrl+C", signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

/// Resolves when `listener` reports its signal. A listener that fails to
/// install never resolves, leaving shutdown to the other signals.
async fn wait_for_signal<E: Display>(name: &str, listener: impl Future<Output = Result<(), E>>) {
    if let Err(e) = listener.await {
        tracing::error!(error = %e, signal = name, "Failed to install signal listener");
        std::future::pending::<()>().await;
    }
}
