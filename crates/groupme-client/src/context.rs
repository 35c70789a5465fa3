//! Handler context that replies through a GroupMe bot.

use crate::client::GroupMeClient;
use async_trait::async_trait;
use handler_registry::{BotContext, Content, HandlerError, HandlerResult};

/// Replies to the group a bot belongs to.
pub struct GroupMeContext {
    client: GroupMeClient,
    bot_id: String,
}

impl GroupMeContext {
    pub fn new(client: GroupMeClient, bot_id: impl Into<String>) -> Self {
        Self {
            client,
            bot_id: bot_id.into(),
        }
    }

    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }
}

#[async_trait]
impl BotContext for GroupMeContext {
    async fn post(&self, content: Content) -> HandlerResult<()> {
        self.client
            .post(&self.bot_id, &content)
            .await
            .map_err(|e| HandlerError::Post(e.to_string()))
    }
}
