//! Registration and handler execution errors.

use thiserror::Error;

/// Errors raised while building the registry.
///
/// These surface at start-up, when handler modules are registered, so a
/// bad handler definition keeps the process from starting.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// One or more platform names are not recognized.
    #[error("Invalid platforms: {0:?}")]
    InvalidPlatforms(Vec<String>),

    /// A pattern failed to compile.
    #[error("Invalid pattern for handler '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised by a handler action while responding to a message.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Posting the response back to the platform failed.
    #[error("Post failed: {0}")]
    Post(String),

    /// An upstream service the action depends on failed.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Result type alias for handler actions.
pub type HandlerResult<T> = Result<T, HandlerError>;
