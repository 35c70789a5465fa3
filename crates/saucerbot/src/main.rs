//! Saucerbot - Entry point.

use channel_store::ChannelStore;
use groupme_client::GroupMeClient;
use handler_registry::Platform;
use saucerbot::{
    api::{create_router, AppState},
    config::Config,
    handlers::build_registry,
    AppResult,
};
use sports::{build_client, vandy_teams, DoresReporter};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let json = config.log.json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    info!("Starting saucerbot");

    let state = match build_state(&config).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Shut down");
}

/// Build clients, handlers and the seeded bot channels.
async fn build_state(config: &Config) -> AppResult<AppState> {
    let groupme = GroupMeClient::new(&config.groupme.api_url, config.groupme.timeout)?;

    let sports_client = build_client(config.sports.timeout)?;
    let reporter = DoresReporter::new(vandy_teams(sports_client, &config.sports.urls()));
    info!("Tracking {} Vanderbilt teams", reporter.teams().len());

    let handler_client = reqwest::Client::builder()
        .timeout(config.handlers.timeout)
        .build()?;
    let registry = build_registry(&config.handlers, handler_client, reporter.clone())?;

    let channels = ChannelStore::new();
    let defaults = registry.default_names(Platform::GroupMe);
    for (bot_id, group_id) in config.bots.groupme_bots() {
        channels
            .provision(&bot_id, Platform::GroupMe, &group_id, defaults.iter().cloned())
            .await?;
    }
    if channels.count().await == 0 {
        warn!("No bots configured, register one with POST /api/bots");
    }

    Ok(AppState::new(registry, channels, groupme, reporter))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
