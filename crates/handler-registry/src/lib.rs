//! Message handler registry for chat bots.
//!
//! Handlers are registered in order at start-up and each incoming message
//! is dispatched through them: the first enabled handler that matches
//! responds, and handlers flagged `always_run` respond regardless.

mod context;
mod error;
mod handler;
mod registry;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use context::{BotContext, Content, Message, Platform, Segment};
pub use error::{HandlerError, HandlerResult, RegistryError};
pub use handler::{Action, Handler, MatchAction, MessageAction, PlainAction, PredicateAction};
pub use registry::{HandlerBuilder, HandlerCriteria, HandlerModule, HandlerRegistry, IntoPatterns};

// Re-exported so match actions can name the captures type.
pub use regex::Captures;
