//! HTTP request handlers.

use super::types::{
    BotsResponse, CallbackResponse, CreateBotRequest, DoresRequest, DoresResponse, HandlerInfo,
    HandlersQuery, HandlersResponse, HealthResponse, UpdateHandlersRequest,
};
use super::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use channel_store::BotChannel;
use chrono::Utc;
use groupme_client::{CallbackMessage, GroupMeContext};
use handler_registry::{Content, HandlerRegistry, Platform};
use sports::{build_message_response, central_date, VandyResult};
use tracing::{debug, info};

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        handler_count: state.registry.len(),
        bot_count: state.channels.count().await,
    })
}

/// Dispatch a message GroupMe pushed to a bot's callback URL.
pub async fn groupme_callback(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
    Json(message): Json<CallbackMessage>,
) -> Result<Json<CallbackResponse>, ApiError> {
    let channel = groupme_channel(&state, &bot_id).await?;

    if message.should_ignore() {
        debug!(bot_id = %bot_id, sender_type = %message.sender_type, "Ignoring message");
        return Ok(Json(CallbackResponse {
            message_sent: false,
            matched_handlers: Vec::new(),
        }));
    }

    let context = GroupMeContext::new(state.groupme.clone(), bot_id.as_str());
    let matched_handlers = state
        .registry
        .handle_message(
            Platform::GroupMe,
            &channel.enabled_handlers(),
            &context,
            &message,
        )
        .await;

    if !matched_handlers.is_empty() {
        info!(bot_id = %bot_id, handlers = ?matched_handlers, "Responded to message");
    }

    Ok(Json(CallbackResponse {
        message_sent: !matched_handlers.is_empty(),
        matched_handlers,
    }))
}

/// List registered handlers, optionally only those available on a platform.
pub async fn list_handlers(
    State(state): State<AppState>,
    Query(query): Query<HandlersQuery>,
) -> Result<Json<HandlersResponse>, ApiError> {
    let handlers: Vec<HandlerInfo> = match query.platform.as_deref() {
        Some(platform) => state
            .registry
            .filter(parse_platform(platform)?)
            .iter()
            .map(HandlerInfo::from)
            .collect(),
        None => state.registry.iter().map(HandlerInfo::from).collect(),
    };

    Ok(Json(HandlersResponse {
        total: handlers.len(),
        handlers,
    }))
}

/// Get a single handler.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<HandlerInfo>, ApiError> {
    state
        .registry
        .by_name(&name)
        .map(|handler| Json(HandlerInfo::from(handler)))
        .ok_or(ApiError::HandlerNotFound(name))
}

/// List all bots.
pub async fn list_bots(State(state): State<AppState>) -> Json<BotsResponse> {
    let bots = state.channels.list().await;

    Json(BotsResponse {
        total: bots.len(),
        bots,
    })
}

/// Register a bot, enabling the platform's default handlers unless told otherwise.
pub async fn create_bot(
    State(state): State<AppState>,
    Json(request): Json<CreateBotRequest>,
) -> Result<(StatusCode, Json<BotChannel>), ApiError> {
    let platform = match request.platform.as_deref() {
        Some(platform) => parse_platform(platform)?,
        None => Platform::GroupMe,
    };

    let handlers = match request.handlers {
        Some(handlers) => {
            validate_handlers(&state.registry, platform, &handlers)?;
            handlers
        }
        None => state.registry.default_names(platform).into_iter().collect(),
    };

    let channel = state
        .channels
        .provision(&request.bot_id, platform, &request.group_id, handlers)
        .await?;

    info!(bot_id = %channel.bot_id, platform = %platform, "Bot registered");
    Ok((StatusCode::CREATED, Json(channel)))
}

/// Get a single bot.
pub async fn get_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
) -> Result<Json<BotChannel>, ApiError> {
    state
        .channels
        .get(&bot_id)
        .await
        .map(Json)
        .ok_or(ApiError::BotNotFound(bot_id))
}

/// Replace the handlers a bot has enabled.
pub async fn update_bot_handlers(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
    Json(request): Json<UpdateHandlersRequest>,
) -> Result<Json<BotChannel>, ApiError> {
    let channel = state
        .channels
        .get(&bot_id)
        .await
        .ok_or_else(|| ApiError::BotNotFound(bot_id.clone()))?;

    validate_handlers(&state.registry, channel.platform, &request.handlers)?;

    let channel = state.channels.set_handlers(&bot_id, request.handlers).await?;
    info!(bot_id = %bot_id, handlers = channel.handlers.len(), "Updated bot handlers");

    Ok(Json(channel))
}

/// Remove a bot.
pub async fn delete_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.channels.remove(&bot_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::BotNotFound(bot_id))
    }
}

/// Look up today's Vanderbilt results, posting them with a bot if one is given.
pub async fn did_the_dores_win(
    State(state): State<AppState>,
    request: Option<Json<DoresRequest>>,
) -> Result<Json<DoresResponse>, ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    if let Some(bot_id) = &request.bot_id {
        groupme_channel(&state, bot_id).await?;
    }

    let today = central_date(Utc::now());
    let results = state
        .reporter
        .latest_results(request.message.as_deref(), today)
        .await?;
    let result = build_message_response(&results, state.reporter.phrasebook());
    let win = results.first().is_some_and(VandyResult::is_win);

    if let (Some(bot_id), Some(text)) = (&request.bot_id, &result) {
        state.groupme.post(bot_id, &Content::from(text.as_str())).await?;
        info!(bot_id = %bot_id, win, "Posted dores result");
    }

    Ok(Json(DoresResponse {
        ok: true,
        win,
        result,
    }))
}

async fn groupme_channel(state: &AppState, bot_id: &str) -> Result<BotChannel, ApiError> {
    let channel = state
        .channels
        .get(bot_id)
        .await
        .ok_or_else(|| ApiError::BotNotFound(bot_id.to_string()))?;

    if channel.platform != Platform::GroupMe {
        return Err(ApiError::WrongPlatform(bot_id.to_string()));
    }
    Ok(channel)
}

fn parse_platform(platform: &str) -> Result<Platform, ApiError> {
    platform
        .parse()
        .map_err(|_| ApiError::InvalidPlatform(platform.to_string()))
}

/// Every name must be a registered handler available on `platform`.
fn validate_handlers(
    registry: &HandlerRegistry,
    platform: Platform,
    names: &[String],
) -> Result<(), ApiError> {
    let invalid: Vec<String> = names
        .iter()
        .filter(|name| {
            registry
                .by_name(name)
                .map_or(true, |handler| !handler.supports(platform))
        })
        .cloned()
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ApiError::InvalidHandlers(invalid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::SaucerModule;
    use handler_registry::HandlerModule;

    fn registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        SaucerModule.register(&mut registry).unwrap();
        registry
    }

    #[test]
    fn test_validate_handlers() {
        let registry = registry();
        let names = vec!["pizza".to_string(), "user_named_saucerbot".to_string()];

        tokio_test::assert_ok!(validate_handlers(&registry, Platform::GroupMe, &names));
        assert!(matches!(
            validate_handlers(&registry, Platform::Discord, &names),
            Err(ApiError::InvalidHandlers(invalid)) if invalid == vec!["user_named_saucerbot"]
        ));
        assert!(matches!(
            validate_handlers(&registry, Platform::GroupMe, &["nope".to_string()]),
            Err(ApiError::InvalidHandlers(invalid)) if invalid == vec!["nope"]
        ));
    }

    #[test]
    fn test_parse_platform() {
        assert_eq!(parse_platform("GroupMe").unwrap(), Platform::GroupMe);
        assert!(matches!(
            parse_platform("irc"),
            Err(ApiError::InvalidPlatform(p)) if p == "irc"
        ));
    }
}
