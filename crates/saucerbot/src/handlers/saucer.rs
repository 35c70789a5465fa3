//! Saucer regulars.

use super::Reply;
use async_trait::async_trait;
use handler_registry::{
    BotContext, Content, HandlerModule, HandlerRegistry, HandlerResult, Message, PredicateAction,
    RegistryError,
};
use rand::Rng;

const SAUCERBOT_NAME: &str = "saucerbot";

const NAME_GIF: &str = "https://media.giphy.com/media/IxmzjBNRGKy8U/giphy.gif";

const NAME_RETORTS: [&str; 4] = [
    "Shut up, ",
    "Go away, ",
    "Go find your own name, ",
    "Stop being an asshole, ",
];

pub struct SaucerModule;

impl HandlerModule for SaucerModule {
    fn name(&self) -> &str {
        "saucer"
    }

    fn register(&self, registry: &mut HandlerRegistry) -> Result<(), RegistryError> {
        registry
            .handler(())
            .description("Chastise people who make their name saucerbot")
            .platforms(["groupme"])
            .predicate(UserNamedSaucerbot)?;

        registry
            .handler(["deep dish", "thin crust"])
            .name("pizza")
            .description("Complain about pizza")
            .plain(Reply("That is a false binary and you know it, asshole"))?;

        registry
            .handler("like if")
            .name("like_if")
            .description("Nobody else can use like if!")
            .plain(Reply("Hey that's my job"))?;

        registry
            .handler([" bot ", "zo"])
            .name("zo_is_dead")
            .description("Zo sux")
            .plain(Reply("Zo is dead.  Long live saucerbot."))?;

        Ok(())
    }
}

/// Picks on anyone who changes their name to saucerbot.
pub struct UserNamedSaucerbot;

impl UserNamedSaucerbot {
    /// Retort `choice`, where the last choice is the gif.
    fn retort(choice: usize, message: &dyn Message) -> Content {
        match NAME_RETORTS.get(choice) {
            Some(prefix) => Content::new()
                .text(*prefix)
                .mention(message.user_id(), format!("@{}", message.user_name())),
            None => NAME_GIF.into(),
        }
    }
}

#[async_trait]
impl PredicateAction for UserNamedSaucerbot {
    async fn call(&self, context: &dyn BotContext, message: &dyn Message) -> HandlerResult<bool> {
        if message.user_name() != SAUCERBOT_NAME {
            return Ok(false);
        }

        let choice = rand::thread_rng().gen_range(0..=NAME_RETORTS.len());
        context.post(Self::retort(choice, message)).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handler_registry::testing::{RecordingContext, TestMessage};
    use handler_registry::Segment;

    #[tokio::test]
    async fn test_user_named_saucerbot() {
        let context = RecordingContext::new();
        let message = TestMessage::new("hi").from_user("123", "saucerbot");

        assert!(UserNamedSaucerbot.call(&context, &message).await.unwrap());

        let posts = context.posts();
        assert_eq!(posts.len(), 1);
        let text = posts[0].plain_text();
        assert!(
            text == NAME_GIF || (posts[0].has_mentions() && text.ends_with("@saucerbot")),
            "{}",
            text
        );
    }

    #[tokio::test]
    async fn test_other_names_ignored() {
        let context = RecordingContext::new();
        let message = TestMessage::new("hi").from_user("123", "Saucerbot Fan");

        assert!(!UserNamedSaucerbot.call(&context, &message).await.unwrap());
        assert!(context.posts().is_empty());
    }

    #[test]
    fn test_retorts() {
        let message = TestMessage::new("hi").from_user("123", "saucerbot");

        assert_eq!(
            UserNamedSaucerbot::retort(1, &message).segments(),
            &[
                Segment::Text("Go away, ".into()),
                Segment::Mention {
                    user_id: "123".into(),
                    display: "@saucerbot".into()
                },
            ]
        );
        assert_eq!(
            UserNamedSaucerbot::retort(NAME_RETORTS.len(), &message).plain_text(),
            NAME_GIF
        );
    }

    #[tokio::test]
    async fn test_zo_needs_spaces_around_bot() {
        let mut registry = HandlerRegistry::new();
        SaucerModule.register(&mut registry).unwrap();
        let handler = registry.by_name("zo_is_dead").unwrap();
        let context = RecordingContext::new();

        assert!(handler
            .run(&context, &TestMessage::new("what a bot you are"))
            .await
            .unwrap());
        assert!(!handler
            .run(&context, &TestMessage::new("robots"))
            .await
            .unwrap());
        assert_eq!(context.texts(), vec!["Zo is dead.  Long live saucerbot."]);
    }
}
