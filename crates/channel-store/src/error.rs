//! Channel store errors.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Bot not found: {0}")]
    NotFound(String),

    #[error("Bot {bot_id} is already registered for {platform}")]
    PlatformMismatch { bot_id: String, platform: String },
}
