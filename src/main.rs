//! Court Status - live open/closed status for a set of courts
//!
//! Serves the status page over HTTP, lets authorized staff update it through
//! a Telegram bot, and keeps the weather readout fresh in the background.

mod api;
mod bot;
mod clock;
mod config;
mod engine;
mod render;
mod state_machine;
mod status;
mod weather;

use api::{create_router, AppState};
use bot::BotPoller;
use clock::{Clock, SystemClock};
use config::Config;
use engine::ConversationEngine;
use status::{StatusRecord, StatusStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather::{MetNoClient, WeatherProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "court_status=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;
    tracing::info!(
        addr = %config.bind_addr,
        timezone = %config.timezone,
        open = config.default_hours.open(),
        close = config.default_hours.close(),
        "Configuration loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(StatusStore::new(StatusRecord::initial(
        config.default_hours,
        clock.now_in(config.timezone),
    )));
    let cancel = CancellationToken::new();
    let mut background = Vec::new();

    // Weather refresher
    let provider: Arc<dyn WeatherProvider> = Arc::new(MetNoClient::new(&config.weather)?);
    background.push(weather::spawn_refresher(
        provider,
        store.clone(),
        config.weather.refresh_interval,
        config.weather.timeout,
        cancel.clone(),
    ));

    // Telegram bot
    match &config.bot_token {
        Some(token) => {
            if config.authorized_users.is_empty() {
                tracing::warn!("AUTHORIZED_USERS is empty; every Telegram user may update status");
            } else {
                tracing::info!(
                    users = config.authorized_users.len(),
                    "Telegram allow-list loaded"
                );
            }
            let engine = Arc::new(ConversationEngine::new(
                store.clone(),
                config.authorized_users.clone(),
                config.timezone,
                clock.clone(),
            ));
            let poller = BotPoller::new(teloxide::Bot::new(token), engine);
            background.push(tokio::spawn(poller.run(cancel.clone())));
        }
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN not set. Telegram bot disabled.");
        }
    }

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(AppState::new(store, clock, config.timezone))
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Court status server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    for task in background {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "Background task ended abnormally");
        }
    }
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown requested");
    cancel.cancel();
}
