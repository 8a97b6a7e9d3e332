pub mod error;
pub mod handlers;
pub mod render;
pub mod state;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::market::MarketData;
use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(|| async { "ok" }))
        // Pages
        .route("/", get(handlers::pages::index))
        .route(
            "/calls",
            get(handlers::pages::call_form).post(handlers::pages::submit_calls),
        )
        .route(
            "/puts",
            get(handlers::pages::put_form).post(handlers::pages::submit_puts),
        )
        // Ladders
        .route(
            "/calldata/{ticker}/{date}/{years}",
            get(handlers::ladder::call_page),
        )
        .route(
            "/putdata/{ticker}/{date}/{years}",
            get(handlers::ladder::put_page),
        )
        .route(
            "/api/ladder/{side}/{ticker}/{date}/{years}",
            get(handlers::ladder::ladder_json),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `serve` command: build the provider and run the server until Ctrl-C.
pub fn run(config: &AppConfig) -> Result<()> {
    let provider = crate::market::from_config(config).context("creating market data provider")?;
    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    rt.block_on(serve(config, provider))
}

pub async fn serve(config: &AppConfig, provider: Arc<dyn MarketData>) -> Result<()> {
    let app = router(AppState::new(provider));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    tracing::info!("options-ladder listening on http://{addr}");
    tracing::info!("  Calls:  GET  http://{addr}/calls");
    tracing::info!("  Puts:   GET  http://{addr}/puts");
    tracing::info!("  JSON:   GET  http://{addr}/api/ladder/{{side}}/{{ticker}}/{{date}}/{{years}}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
