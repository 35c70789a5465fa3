//! Error types for saucerbot.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Start-up errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Handler registration failed: {0}")]
    Registry(#[from] handler_registry::RegistryError),

    #[error("GroupMe client error: {0}")]
    GroupMe(#[from] groupme_client::GroupMeError),

    #[error("Sports client error: {0}")]
    Sports(#[from] sports::SportsError),

    #[error("Channel error: {0}")]
    Channel(#[from] channel_store::ChannelError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// HTTP API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bot not found: {0}")]
    BotNotFound(String),

    #[error("Handler not found: {0}")]
    HandlerNotFound(String),

    #[error("Invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("Unknown or unavailable handlers: {}", .0.join(", "))]
    InvalidHandlers(Vec<String>),

    #[error("Bot {0} is not a GroupMe bot")]
    WrongPlatform(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Score lookup failed: {0}")]
    Sports(String),

    #[error("GroupMe API error: {0}")]
    GroupMe(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BotNotFound(_) => (StatusCode::NOT_FOUND, "BOT_NOT_FOUND"),
            ApiError::HandlerNotFound(_) => (StatusCode::NOT_FOUND, "HANDLER_NOT_FOUND"),
            ApiError::InvalidPlatform(_) => (StatusCode::BAD_REQUEST, "INVALID_PLATFORM"),
            ApiError::InvalidHandlers(_) => (StatusCode::BAD_REQUEST, "INVALID_HANDLERS"),
            ApiError::WrongPlatform(_) => (StatusCode::BAD_REQUEST, "WRONG_PLATFORM"),
            ApiError::Channel(_) => (StatusCode::CONFLICT, "CHANNEL_CONFLICT"),
            ApiError::Sports(_) => (StatusCode::BAD_GATEWAY, "SPORTS_API_ERROR"),
            ApiError::GroupMe(_) => (StatusCode::BAD_GATEWAY, "GROUPME_API_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<channel_store::ChannelError> for ApiError {
    fn from(e: channel_store::ChannelError) -> Self {
        match e {
            channel_store::ChannelError::NotFound(bot_id) => ApiError::BotNotFound(bot_id),
            other => ApiError::Channel(other.to_string()),
        }
    }
}

impl From<sports::SportsError> for ApiError {
    fn from(e: sports::SportsError) -> Self {
        ApiError::Sports(e.to_string())
    }
}

impl From<groupme_client::GroupMeError> for ApiError {
    fn from(e: groupme_client::GroupMeError) -> Self {
        ApiError::GroupMe(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BotNotFound("b".into()), StatusCode::NOT_FOUND),
            (ApiError::InvalidHandlers(vec!["x".into()]), StatusCode::BAD_REQUEST),
            (ApiError::InvalidPlatform("irc".into()), StatusCode::BAD_REQUEST),
            (ApiError::Sports("timeout".into()), StatusCode::BAD_GATEWAY),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_channel_not_found_maps_to_bot_not_found() {
        let error: ApiError = channel_store::ChannelError::NotFound("ghost".into()).into();
        assert!(matches!(error, ApiError::BotNotFound(id) if id == "ghost"));
    }

    #[test]
    fn test_invalid_handlers_message() {
        let error = ApiError::InvalidHandlers(vec!["nope".into(), "user_named_saucerbot".into()]);
        assert_eq!(
            error.to_string(),
            "Unknown or unavailable handlers: nope, user_named_saucerbot"
        );
    }
}
