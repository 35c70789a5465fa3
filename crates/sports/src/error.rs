//! Score lookup errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SportsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schedule page error: {0}")]
    SchedulePage(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
