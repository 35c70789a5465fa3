//! Vanderbilt cheers and score lookups.

use super::Reply;
use async_trait::async_trait;
use handler_registry::{
    BotContext, HandlerModule, HandlerRegistry, HandlerResult, Message, MessageAction,
    RegistryError,
};
use sports::{central_date, DoresReporter};
use tracing::error;

const NOT_FOUND: &str = "I couldn't find the Vandy game 😢";
const LOOKUP_FAILED: &str = "Sorry, I couldn't get the score right now 😢";

pub struct VandyModule {
    reporter: DoresReporter,
}

impl VandyModule {
    pub fn new(reporter: DoresReporter) -> Self {
        Self { reporter }
    }
}

impl HandlerModule for VandyModule {
    fn name(&self) -> &str {
        "vandy"
    }

    fn register(&self, registry: &mut HandlerRegistry) -> Result<(), RegistryError> {
        registry
            .handler(["ohhh+", "go dores"])
            .name("go_dores")
            .description("Posts anchor down ⚓️")
            .plain(Reply("ANCHOR DOWN ⚓️"))?;

        registry
            .handler("anchor down")
            .name("anchor_down")
            .description("Posts go dores!")
            .plain(Reply("GO DORES"))?;

        registry
            .handler("black")
            .name("black")
            .description("BLACK GOLD")
            .plain(Reply("GOLD"))?;

        registry
            .handler("gold")
            .name("gold")
            .description("GOLD BLACK")
            .plain(Reply("BLACK"))?;

        registry
            .handler(["did the dores win", "did vandy win"])
            .description("The 'dores never win RIP")
            .with_message(DoresWin::new(self.reporter.clone()))?;

        Ok(())
    }
}

/// Answers "did the dores win" with the latest in-season results.
pub struct DoresWin {
    reporter: DoresReporter,
}

impl DoresWin {
    pub fn new(reporter: DoresReporter) -> Self {
        Self { reporter }
    }
}

#[async_trait]
impl MessageAction for DoresWin {
    async fn call(&self, context: &dyn BotContext, message: &dyn Message) -> HandlerResult<()> {
        let date = central_date(message.created_at());

        let reply = match self
            .reporter
            .did_the_dores_win(Some(message.content()), date)
            .await
        {
            Ok(Some(result)) => result,
            Ok(None) => NOT_FOUND.to_string(),
            Err(e) => {
                error!("Score lookup failed: {}", e);
                LOOKUP_FAILED.to_string()
            }
        };

        context.post(reply.into()).await
    }
}
