// Data Review - Web Server
// Serves the review batch and CSV exports over HTTP

use anyhow::{Context, Result};
use data_review::{api, Config};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "data_review=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    // The loader blocks, keep it off the async workers
    let source = config.source.clone();
    let store = tokio::task::spawn_blocking(move || source.load())
        .await
        .context("Load task panicked")?
        .with_context(|| format!("Failed to load records from {}", config.source))?;

    tracing::info!(records = store.len(), source = %config.source, "Record store ready");

    let app = api::router(store)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server running on http://{}", addr);
    tracing::info!("API: http://{}/api/data", addr);

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}
