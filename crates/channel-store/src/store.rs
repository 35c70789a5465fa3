//! In-memory channel storage.

use crate::error::ChannelError;
use crate::types::BotChannel;
use handler_registry::Platform;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Bot channels keyed by bot id. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct ChannelStore {
    channels: Arc<RwLock<HashMap<String, BotChannel>>>,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bot with `defaults` enabled. Provisioning a bot that
    /// already exists on the same platform returns it unchanged.
    #[instrument(skip(self, defaults))]
    pub async fn provision(
        &self,
        bot_id: &str,
        platform: Platform,
        group_id: &str,
        defaults: impl IntoIterator<Item = String>,
    ) -> Result<BotChannel, ChannelError> {
        let mut channels = self.channels.write().await;

        if let Some(existing) = channels.get(bot_id) {
            if existing.platform != platform {
                return Err(ChannelError::PlatformMismatch {
                    bot_id: bot_id.to_string(),
                    platform: existing.platform.to_string(),
                });
            }
            debug!("Bot {} already provisioned", bot_id);
            return Ok(existing.clone());
        }

        let channel = BotChannel::new(bot_id, platform, group_id, defaults);
        info!(
            "Provisioned bot {} for group {} ({} handlers)",
            bot_id,
            group_id,
            channel.handlers.len()
        );
        channels.insert(bot_id.to_string(), channel.clone());
        Ok(channel)
    }

    pub async fn get(&self, bot_id: &str) -> Option<BotChannel> {
        self.channels.read().await.get(bot_id).cloned()
    }

    /// Enabled handler names for a bot, or `None` for an unknown bot.
    pub async fn enabled_handlers(&self, bot_id: &str) -> Option<HashSet<String>> {
        self.channels
            .read()
            .await
            .get(bot_id)
            .map(BotChannel::enabled_handlers)
    }

    /// Replace a bot's enabled handlers.
    #[instrument(skip(self, handlers))]
    pub async fn set_handlers(
        &self,
        bot_id: &str,
        handlers: impl IntoIterator<Item = String>,
    ) -> Result<BotChannel, ChannelError> {
        self.update(bot_id, |channel| {
            channel.handlers = handlers.into_iter().collect::<BTreeSet<_>>();
        })
        .await
    }

    /// Turn one handler on. Returns whether it was previously off.
    pub async fn enable(&self, bot_id: &str, handler: &str) -> Result<bool, ChannelError> {
        let mut added = false;
        self.update(bot_id, |channel| {
            added = channel.handlers.insert(handler.to_string());
        })
        .await?;
        Ok(added)
    }

    /// Turn one handler off. Returns whether it was previously on.
    pub async fn disable(&self, bot_id: &str, handler: &str) -> Result<bool, ChannelError> {
        let mut removed = false;
        self.update(bot_id, |channel| {
            removed = channel.handlers.remove(handler);
        })
        .await?;
        Ok(removed)
    }

    /// Forget a bot. Returns whether it existed.
    #[instrument(skip(self))]
    pub async fn remove(&self, bot_id: &str) -> bool {
        let removed = self.channels.write().await.remove(bot_id).is_some();
        if removed {
            info!("Removed bot {}", bot_id);
        }
        removed
    }

    /// All channels, ordered by bot id.
    pub async fn list(&self) -> Vec<BotChannel> {
        let mut channels: Vec<_> = self.channels.read().await.values().cloned().collect();
        channels.sort_by(|a, b| a.bot_id.cmp(&b.bot_id));
        channels
    }

    pub async fn count(&self) -> usize {
        self.channels.read().await.len()
    }

    async fn update(
        &self,
        bot_id: &str,
        change: impl FnOnce(&mut BotChannel),
    ) -> Result<BotChannel, ChannelError> {
        let mut channels = self.channels.write().await;
        let channel = channels
            .get_mut(bot_id)
            .ok_or_else(|| ChannelError::NotFound(bot_id.to_string()))?;

        change(channel);
        channel.touch();
        debug!("Bot {} now has {} handlers", bot_id, channel.handlers.len());

        Ok(channel.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["dont_at_me".into(), "sneaky".into(), "teenage_saucerbot".into()]
    }

    #[tokio::test]
    async fn test_provision_and_get() {
        let store = ChannelStore::new();

        let channel = store
            .provision("bot1", Platform::GroupMe, "group1", defaults())
            .await
            .unwrap();

        assert_eq!(channel.bot_id, "bot1");
        assert_eq!(channel.group_id, "group1");
        assert_eq!(channel.handlers.len(), 3);
        assert_eq!(store.get("bot1").await, Some(channel));
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let store = ChannelStore::new();

        store
            .provision("bot1", Platform::GroupMe, "group1", defaults())
            .await
            .unwrap();
        store.set_handlers("bot1", vec!["lit".to_string()]).await.unwrap();

        let again = store
            .provision("bot1", Platform::GroupMe, "group1", defaults())
            .await
            .unwrap();

        assert_eq!(again.handlers.iter().collect::<Vec<_>>(), vec!["lit"]);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_provision_platform_mismatch() {
        let store = ChannelStore::new();

        store
            .provision("bot1", Platform::GroupMe, "group1", defaults())
            .await
            .unwrap();
        let result = store
            .provision("bot1", Platform::Discord, "group1", defaults())
            .await;

        assert!(matches!(result, Err(ChannelError::PlatformMismatch { .. })));
    }

    #[tokio::test]
    async fn test_enabled_handlers_snapshot() {
        let store = ChannelStore::new();
        store
            .provision("bot1", Platform::GroupMe, "group1", defaults())
            .await
            .unwrap();

        let snapshot = store.enabled_handlers("bot1").await.unwrap();
        store.disable("bot1", "sneaky").await.unwrap();

        assert!(snapshot.contains("sneaky"));
        assert!(!store.enabled_handlers("bot1").await.unwrap().contains("sneaky"));
        assert!(store.enabled_handlers("nobody").await.is_none());
    }

    #[tokio::test]
    async fn test_enable_and_disable() {
        let store = ChannelStore::new();
        store
            .provision("bot1", Platform::GroupMe, "group1", Vec::new())
            .await
            .unwrap();

        assert!(store.enable("bot1", "lit").await.unwrap());
        assert!(!store.enable("bot1", "lit").await.unwrap());
        assert!(store.disable("bot1", "lit").await.unwrap());
        assert!(!store.disable("bot1", "lit").await.unwrap());
    }

    #[tokio::test]
    async fn test_updates_touch_timestamp() {
        let store = ChannelStore::new();
        let created = store
            .provision("bot1", Platform::GroupMe, "group1", Vec::new())
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let updated = store.set_handlers("bot1", defaults()).await.unwrap();

        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_unknown_bot() {
        let store = ChannelStore::new();

        assert_eq!(
            store.set_handlers("ghost", defaults()).await,
            Err(ChannelError::NotFound("ghost".into()))
        );
        tokio_test::assert_err!(store.enable("ghost", "lit").await);
        assert!(!store.remove("ghost").await);
    }

    #[tokio::test]
    async fn test_remove_and_list() {
        let store = ChannelStore::new();
        for bot in ["b", "a", "c"] {
            store
                .provision(bot, Platform::GroupMe, "group", Vec::new())
                .await
                .unwrap();
        }

        assert!(store.remove("b").await);

        let ids: Vec<_> = store.list().await.into_iter().map(|c| c.bot_id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(store.count().await, 2);
    }

    #[test]
    fn test_channel_serialization() {
        let channel = BotChannel::new("bot1", Platform::GroupMe, "group1", defaults());
        let json = serde_json::to_value(&channel).unwrap();

        assert_eq!(json["platform"], "groupme");
        assert_eq!(
            json["handlers"],
            serde_json::json!(["dont_at_me", "sneaky", "teenage_saucerbot"])
        );
    }
}
