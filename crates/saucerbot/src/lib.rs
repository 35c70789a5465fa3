//! Saucerbot - a chat bot for the Saucer regulars.
//!
//! Incoming GroupMe messages are dispatched through an ordered handler
//! registry, limited to the handlers each bot has enabled. Handlers answer
//! trigger phrases, tell cat facts and report on Vanderbilt games.

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;

pub use config::Config;
pub use error::{ApiError, AppError, AppResult};
