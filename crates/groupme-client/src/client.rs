//! GroupMe bot HTTP client.

use crate::error::GroupMeError;
use crate::types::BotPostRequest;
use handler_registry::Content;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const GROUPME_API_URL: &str = "https://api.groupme.com";

/// Client for the GroupMe bots API.
#[derive(Clone)]
pub struct GroupMeClient {
    client: Client,
    base_url: String,
}

impl GroupMeClient {
    /// Create a new GroupMe client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GroupMeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post a message to the group the bot belongs to.
    #[instrument(skip(self, content))]
    pub async fn post(&self, bot_id: &str, content: &Content) -> Result<(), GroupMeError> {
        if content.is_empty() {
            return Err(GroupMeError::EmptyMessage);
        }

        let request = BotPostRequest::from_content(bot_id, content);
        let response = self
            .client
            .post(format!("{}/v3/bots/post", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Post failed: {} {}", status, body);
            return Err(GroupMeError::PostFailed {
                status: status.as_u16(),
                body,
            });
        }

        debug!(mentions = content.has_mentions(), "Posted message");
        Ok(())
    }
}
