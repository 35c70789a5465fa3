//! Platform-facing capabilities consumed by handler actions.

use crate::error::{HandlerResult, RegistryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chat platform a message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Discord,
    GroupMe,
}

impl Platform {
    /// Every platform a handler can be registered for.
    pub const ALL: [Platform; 2] = [Platform::Discord, Platform::GroupMe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Discord => "discord",
            Platform::GroupMe => "groupme",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discord" => Ok(Platform::Discord),
            "groupme" => Ok(Platform::GroupMe),
            _ => Err(RegistryError::InvalidPlatforms(vec![s.to_string()])),
        }
    }
}

/// One piece of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Reference to a user, rendered with `display` as its visible text.
    Mention { user_id: String, display: String },
}

/// Outgoing message content: plain text or text mixed with mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    segments: Vec<Segment>,
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text segment.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Text(text.into()));
        self
    }

    /// Append a user mention.
    pub fn mention(mut self, user_id: impl Into<String>, display: impl Into<String>) -> Self {
        self.segments.push(Segment::Mention {
            user_id: user_id.into(),
            display: display.into(),
        });
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any segment is a mention.
    pub fn has_mentions(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Mention { .. }))
    }

    /// Render the content as the text a user would see.
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Text(text) => text.as_str(),
                Segment::Mention { display, .. } => display.as_str(),
            })
            .collect()
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::new().text(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::new().text(text)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_text())
    }
}

/// Posting capability for the bot/channel that received a message.
#[async_trait]
pub trait BotContext: Send + Sync {
    /// Post a message back to the channel.
    async fn post(&self, content: Content) -> HandlerResult<()>;
}

/// Normalized view of an incoming chat message.
pub trait Message: Send + Sync {
    fn user_id(&self) -> &str;

    fn user_name(&self) -> &str;

    fn content(&self) -> &str;

    /// When the message was sent, in UTC.
    fn created_at(&self) -> DateTime<Utc>;
}
