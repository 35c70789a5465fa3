//! GroupMe API types.

use chrono::{DateTime, TimeZone, Utc};
use handler_registry::{Content, Message, Segment};
use serde::{Deserialize, Serialize};

/// Message pushed to a bot's callback URL.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub group_id: String,
    pub name: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub sender_type: String,
    pub user_id: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Unix seconds.
    pub created_at: i64,
    #[serde(default)]
    pub system: bool,
    #[serde(default)]
    pub attachments: Vec<serde_json::Value>,
}

impl CallbackMessage {
    /// Messages posted by bots or by GroupMe itself never reach handlers,
    /// so a bot cannot answer its own posts.
    pub fn should_ignore(&self) -> bool {
        self.system || self.sender_type == "bot"
    }
}

impl Message for CallbackMessage {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn user_name(&self) -> &str {
        &self.name
    }

    fn content(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    fn created_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.created_at, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Attachment on an outgoing bot post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    Mentions {
        user_ids: Vec<String>,
        /// `[start, length]` of each mention, in UTF-16 code units.
        loci: Vec<[usize; 2]>,
    },
}

/// Body of `POST /v3/bots/post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotPostRequest {
    pub bot_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl BotPostRequest {
    pub fn from_content(bot_id: impl Into<String>, content: &Content) -> Self {
        let mut text = String::new();
        let mut user_ids = Vec::new();
        let mut loci = Vec::new();

        for segment in content.segments() {
            match segment {
                Segment::Text(part) => text.push_str(part),
                Segment::Mention { user_id, display } => {
                    let start = text.encode_utf16().count();
                    text.push_str(display);
                    user_ids.push(user_id.clone());
                    loci.push([start, display.encode_utf16().count()]);
                }
            }
        }

        let attachments = if user_ids.is_empty() {
            Vec::new()
        } else {
            vec![Attachment::Mentions { user_ids, loci }]
        };

        Self {
            bot_id: bot_id.into(),
            text,
            attachments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn callback(sender_type: &str, system: bool) -> CallbackMessage {
        serde_json::from_value(json!({
            "attachments": [],
            "avatar_url": "https://i.groupme.com/123456789",
            "created_at": 1302623328,
            "group_id": "1234567890",
            "id": "1234567890",
            "name": "John",
            "sender_id": "12345",
            "sender_type": sender_type,
            "source_guid": "GUID",
            "system": system,
            "text": "Hello world ☃☃",
            "user_id": "12345"
        }))
        .unwrap()
    }

    #[test]
    fn test_callback_as_message() {
        let message = callback("user", false);
        assert_eq!(message.user_id(), "12345");
        assert_eq!(message.user_name(), "John");
        assert_eq!(message.content(), "Hello world ☃☃");
        assert_eq!(message.created_at().timestamp(), 1302623328);
        assert!(!message.should_ignore());
    }

    #[test]
    fn test_ignores_bots_and_system() {
        assert!(callback("bot", false).should_ignore());
        assert!(callback("system", true).should_ignore());
    }

    #[test]
    fn test_missing_text() {
        let message: CallbackMessage = serde_json::from_value(json!({
            "name": "John",
            "user_id": "12345",
            "created_at": 1302623328,
            "text": null
        }))
        .unwrap();
        assert_eq!(message.content(), "");
    }

    #[test]
    fn test_plain_post() {
        let request = BotPostRequest::from_content("bot-1", &Content::from("Nice 👌"));
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"bot_id": "bot-1", "text": "Nice 👌"})
        );
    }

    #[test]
    fn test_post_with_mentions() {
        let content = Content::new()
            .text("👋 ")
            .mention("42", "@Jane")
            .text(" and ")
            .mention("43", "@Bob");
        let request = BotPostRequest::from_content("bot-1", &content);

        assert_eq!(request.text, "👋 @Jane and @Bob");
        assert_eq!(
            serde_json::to_value(&request).unwrap()["attachments"],
            json!([{
                "type": "mentions",
                "user_ids": ["42", "43"],
                "loci": [[3, 5], [13, 4]]
            }])
        );
    }
}
