mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use ngpost_core::PostalCodeTable;
use ngpost_geocoder::{GeocodingClient, LocationResolver, RateLimiter, ReverseGeocoder};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ngpost_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let table = PostalCodeTable::load(config.postal_codes_path.as_deref())?;
    tracing::info!(records = table.len(), "postal code table loaded");

    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
        config.geocoder_min_interval_ms,
    )));
    let geocoder: Arc<dyn ReverseGeocoder> = Arc::new(GeocodingClient::from_config(&config, limiter)?);
    let resolver = LocationResolver::new(Arc::new(table), geocoder);

    let app = build_app(
        AppState {
            resolver: Arc::new(resolver),
        },
        RateLimitState::per_minute(config.api_rate_limit_per_minute),
    );

    tracing::info!(bind_addr = %config.bind_addr, env = %config.env, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
