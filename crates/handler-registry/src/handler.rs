//! Handler definitions and single-handler execution.

use crate::context::{BotContext, Message, Platform};
use crate::error::HandlerResult;
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Action that only needs to post.
#[async_trait]
pub trait PlainAction: Send + Sync {
    async fn call(&self, context: &dyn BotContext) -> HandlerResult<()>;
}

/// Action that reads the triggering message.
#[async_trait]
pub trait MessageAction: Send + Sync {
    async fn call(&self, context: &dyn BotContext, message: &dyn Message) -> HandlerResult<()>;
}

/// Action that reads the captures of the pattern that matched.
#[async_trait]
pub trait MatchAction: Send + Sync {
    async fn call(
        &self,
        context: &dyn BotContext,
        message: &dyn Message,
        captures: &Captures<'_>,
    ) -> HandlerResult<()>;
}

/// Action that decides for itself whether it responded.
#[async_trait]
pub trait PredicateAction: Send + Sync {
    /// Returns `true` when the action produced a response.
    async fn call(&self, context: &dyn BotContext, message: &dyn Message) -> HandlerResult<bool>;
}

/// The action kind, fixed at registration time.
#[derive(Clone)]
pub enum Action {
    Plain(Arc<dyn PlainAction>),
    Message(Arc<dyn MessageAction>),
    Match(Arc<dyn MatchAction>),
    Predicate(Arc<dyn PredicateAction>),
}

impl Action {
    fn kind(&self) -> &'static str {
        match self {
            Action::Plain(_) => "plain",
            Action::Message(_) => "message",
            Action::Match(_) => "match",
            Action::Predicate(_) => "predicate",
        }
    }
}

/// A named unit of response logic.
#[derive(Clone)]
pub struct Handler {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) patterns: Vec<Regex>,
    pub(crate) platforms: BTreeSet<Platform>,
    pub(crate) action: Action,
    pub(crate) on_by_default: bool,
    pub(crate) always_run: bool,
}

impl Handler {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }

    pub fn on_by_default(&self) -> bool {
        self.on_by_default
    }

    pub fn always_run(&self) -> bool {
        self.always_run
    }

    /// Whether this is a regex handler rather than a predicate handler.
    pub fn has_patterns(&self) -> bool {
        !self.patterns.is_empty()
    }

    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    /// Run the handler against a message, returning whether it matched.
    ///
    /// Regex handlers match as soon as one pattern is found anywhere in the
    /// content. Predicate handlers match only when their action says so.
    pub async fn run(
        &self,
        context: &dyn BotContext,
        message: &dyn Message,
    ) -> HandlerResult<bool> {
        if self.has_patterns() {
            self.run_patterns(context, message).await
        } else {
            self.run_without_patterns(context, message).await
        }
    }

    async fn run_patterns(
        &self,
        context: &dyn BotContext,
        message: &dyn Message,
    ) -> HandlerResult<bool> {
        let content = message.content();

        for pattern in &self.patterns {
            let Some(captures) = pattern.captures(content) else {
                continue;
            };

            debug!(handler = %self.name, pattern = pattern.as_str(), "Pattern matched");

            match &self.action {
                Action::Plain(action) => action.call(context).await?,
                Action::Message(action) => action.call(context, message).await?,
                Action::Match(action) => action.call(context, message, &captures).await?,
                Action::Predicate(action) => {
                    action.call(context, message).await?;
                }
            }
            return Ok(true);
        }

        Ok(false)
    }

    async fn run_without_patterns(
        &self,
        context: &dyn BotContext,
        message: &dyn Message,
    ) -> HandlerResult<bool> {
        match &self.action {
            Action::Predicate(action) => action.call(context, message).await,
            // No meaningful return value, so these never report a match.
            Action::Plain(action) => {
                action.call(context).await?;
                Ok(false)
            }
            Action::Message(action) => {
                action.call(context, message).await?;
                Ok(false)
            }
            Action::Match(_) => Ok(false),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field(
                "patterns",
                &self.patterns.iter().map(Regex::as_str).collect::<Vec<_>>(),
            )
            .field("platforms", &self.platforms)
            .field("action", &self.action.kind())
            .field("on_by_default", &self.on_by_default)
            .field("always_run", &self.always_run)
            .finish()
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{} - {}", self.name, description),
            None => f.write_str(&self.name),
        }
    }
}

/// Derive a handler name from an action's type: `GoDores` becomes `go_dores`.
pub(crate) fn default_name<A: ?Sized>() -> String {
    let full = std::any::type_name::<A>();
    let base = full.split('<').next().unwrap_or(full);
    let ident = base.rsplit("::").next().unwrap_or(base);
    to_snake_case(ident)
}

fn to_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
