//! In-memory context and message for exercising handlers in tests.

use crate::context::{BotContext, Content, Message};
use crate::error::HandlerResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Context that records every post instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingContext {
    posts: Mutex<Vec<Content>>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> Vec<Content> {
        match self.posts.lock() {
            Ok(posts) => posts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Posted messages rendered as plain text.
    pub fn texts(&self) -> Vec<String> {
        self.posts().iter().map(Content::plain_text).collect()
    }
}

#[async_trait]
impl BotContext for RecordingContext {
    async fn post(&self, content: Content) -> HandlerResult<()> {
        match self.posts.lock() {
            Ok(mut posts) => posts.push(content),
            Err(poisoned) => poisoned.into_inner().push(content),
        }
        Ok(())
    }
}

/// Message with fixed fields.
#[derive(Debug, Clone)]
pub struct TestMessage {
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TestMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            user_id: "1".into(),
            user_name: "Test User".into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn from_user(mut self, user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self.user_name = user_name.into();
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

impl Message for TestMessage {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn user_name(&self) -> &str {
        &self.user_name
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
