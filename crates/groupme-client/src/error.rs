//! GroupMe client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupMeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Post failed ({status}): {body}")]
    PostFailed { status: u16, body: String },

    #[error("Empty message")]
    EmptyMessage,
}
