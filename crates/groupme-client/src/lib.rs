//! GroupMe bots API client.

mod client;
mod context;
mod error;
mod types;

pub use client::{GroupMeClient, GROUPME_API_URL};
pub use context::GroupMeContext;
pub use error::GroupMeError;
pub use types::*;
