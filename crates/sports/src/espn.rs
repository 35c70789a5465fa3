//! Shared pieces of the ESPN payloads.

use crate::error::SportsError;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// HTTP client used for every ESPN request.
pub fn build_client(timeout: Duration) -> Result<Client, SportsError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// ESPN reports scores as strings on some endpoints and as numbers on
/// others. Missing or blank scores read as zero.
pub(crate) fn score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
        Missing(Option<()>),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) if s.trim().is_empty() => Ok(0),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::Missing(_) => Ok(0),
    }
}
