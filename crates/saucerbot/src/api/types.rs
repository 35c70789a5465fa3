//! API request and response types.

use channel_store::BotChannel;
use handler_registry::{Handler, Platform};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub handler_count: usize,
    pub bot_count: usize,
}

/// Response to a GroupMe callback.
#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub message_sent: bool,
    pub matched_handlers: Vec<String>,
}

/// Query for the handler listing.
#[derive(Debug, Default, Deserialize)]
pub struct HandlersQuery {
    /// Only handlers available on this platform
    pub platform: Option<String>,
}

/// Handler info for listing.
#[derive(Debug, Serialize)]
pub struct HandlerInfo {
    pub name: String,
    pub description: Option<String>,
    pub platforms: Vec<Platform>,
    pub regexes: Vec<String>,
    pub on_by_default: bool,
    pub always_run: bool,
}

impl From<&Handler> for HandlerInfo {
    fn from(handler: &Handler) -> Self {
        Self {
            name: handler.name().to_string(),
            description: handler.description().map(str::to_string),
            platforms: handler.platforms().iter().copied().collect(),
            regexes: handler.patterns().iter().map(|p| p.as_str().to_string()).collect(),
            on_by_default: handler.on_by_default(),
            always_run: handler.always_run(),
        }
    }
}

/// List of handlers.
#[derive(Debug, Serialize)]
pub struct HandlersResponse {
    pub handlers: Vec<HandlerInfo>,
    pub total: usize,
}

/// Request to register a bot.
#[derive(Debug, Deserialize)]
pub struct CreateBotRequest {
    pub bot_id: String,

    pub group_id: String,

    /// Platform name, GroupMe if omitted
    pub platform: Option<String>,

    /// Handlers to enable instead of the platform defaults
    pub handlers: Option<Vec<String>>,
}

/// List of bots.
#[derive(Debug, Serialize)]
pub struct BotsResponse {
    pub bots: Vec<BotChannel>,
    pub total: usize,
}

/// Request to replace a bot's enabled handlers.
#[derive(Debug, Deserialize)]
pub struct UpdateHandlersRequest {
    pub handlers: Vec<String>,
}

/// Request to look up the latest Vanderbilt results.
#[derive(Debug, Default, Deserialize)]
pub struct DoresRequest {
    /// Message text used to pick the teams
    pub message: Option<String>,

    /// GroupMe bot to post the result with
    pub bot_id: Option<String>,
}

/// Latest Vanderbilt results.
#[derive(Debug, Serialize)]
pub struct DoresResponse {
    pub ok: bool,
    /// Whether the most relevant game was a win
    pub win: bool,
    pub result: Option<String>,
}
