//! quotemaster-cloud: procurement quotation service
//!
//! Long-running HTTP service that:
//! - Builds product × supplier price comparison matrices per period/region
//! - Runs the quotation workflow (submit → negotiate → approve / reject)
//! - Records approved prices into price history
//! - Stores kitchen demand used for matrix quantities

mod api;
mod config;
mod db;
mod error;
mod matrix;
mod services;
mod state;

use config::Config;
use db::BoxError;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotemaster_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        environment = %config.environment,
        lookback_months = config.price_lookback_months,
        "Starting quotemaster-cloud"
    );

    let state = AppState::new(&config).await?;
    let app = api::create_router(state, config.cors_allow_origin.as_deref());

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("quotemaster-cloud HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("quotemaster-cloud stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
