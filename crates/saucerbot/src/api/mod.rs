//! HTTP API for saucerbot.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use channel_store::ChannelStore;
use groupme_client::GroupMeClient;
use handler_registry::HandlerRegistry;
use sports::DoresReporter;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Handlers, in dispatch order
    pub registry: Arc<HandlerRegistry>,
    /// Enabled handlers per bot
    pub channels: ChannelStore,
    /// GroupMe bots API client
    pub groupme: GroupMeClient,
    /// Vanderbilt score lookups
    pub reporter: DoresReporter,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        registry: HandlerRegistry,
        channels: ChannelStore,
        groupme: GroupMeClient,
        reporter: DoresReporter,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            channels,
            groupme,
            reporter,
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Platform callbacks
        .route("/groupme/callbacks/:bot_id", post(handlers::groupme_callback))
        // Handler catalog
        .route("/api/handlers", get(handlers::list_handlers))
        .route("/api/handlers/:name", get(handlers::get_handler))
        // Bot management
        .route("/api/bots", get(handlers::list_bots).post(handlers::create_bot))
        .route(
            "/api/bots/:bot_id",
            get(handlers::get_bot).delete(handlers::delete_bot),
        )
        .route("/api/bots/:bot_id/handlers", put(handlers::update_bot_handlers))
        .route("/api/dores", post(handlers::did_the_dores_win))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
