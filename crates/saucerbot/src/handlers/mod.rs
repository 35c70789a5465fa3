//! Saucerbot's handlers, grouped into the modules registered at start-up.

mod general;
mod saucer;
mod vandy;

pub use general::{BarelyKnowHer, Catfacts, GeneralModule, TooEarlyForThai};
pub use saucer::{SaucerModule, UserNamedSaucerbot};
pub use vandy::{DoresWin, VandyModule};

use crate::config::HandlersConfig;
use async_trait::async_trait;
use handler_registry::{BotContext, HandlerRegistry, HandlerResult, PlainAction, RegistryError};
use rand::Rng;
use reqwest::Client;
use sports::DoresReporter;

/// Posts a fixed response.
pub struct Reply(pub &'static str);

#[async_trait]
impl PlainAction for Reply {
    async fn call(&self, context: &dyn BotContext) -> HandlerResult<()> {
        context.post(self.0.into()).await
    }
}

/// A percent chance, rolled per message.
#[derive(Debug, Clone, Copy)]
pub struct Chance(u32);

impl Chance {
    pub fn percent(percent: u32) -> Self {
        Self(percent.min(100))
    }

    pub fn roll(&self) -> bool {
        rand::thread_rng().gen_range(0..100) < self.0
    }
}

/// Build the registry with every module, in dispatch order.
pub fn build_registry(
    config: &HandlersConfig,
    client: Client,
    reporter: DoresReporter,
) -> Result<HandlerRegistry, RegistryError> {
    let vandy = VandyModule::new(reporter);
    let general = GeneralModule::new(config, client);
    let saucer = SaucerModule;

    let mut registry = HandlerRegistry::new();
    registry.initialize(&[&vandy, &general, &saucer])?;
    Ok(registry)
}
