//! In-memory registry of bot channels and their enabled handlers.
//!
//! Each bot belongs to one chat group. Its enabled handler set starts as
//! the registry's on-by-default handlers and can be changed afterwards.

mod error;
mod store;
mod types;

pub use error::ChannelError;
pub use store::ChannelStore;
pub use types::*;
