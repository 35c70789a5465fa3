//! Configuration for saucerbot.

use anyhow::{Context, Result};
use serde::Deserialize;
use sports::SportsUrls;
use std::time::Duration;

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// GroupMe API configuration
    #[serde(default)]
    pub groupme: GroupMeConfig,

    /// Score lookups
    #[serde(default)]
    pub sports: SportsConfig,

    /// Handler tuning
    #[serde(default)]
    pub handlers: HandlersConfig,

    /// Bots to register at start-up
    #[serde(default)]
    pub bots: BotsConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupMeConfig {
    /// GroupMe API base URL
    #[serde(default = "default_groupme_api_url")]
    pub api_url: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SportsConfig {
    /// Request timeout for score providers
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_football_url")]
    pub football_url: String,

    #[serde(default = "default_mens_basketball_url")]
    pub mens_basketball_url: String,

    #[serde(default = "default_womens_basketball_url")]
    pub womens_basketball_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HandlersConfig {
    /// Percent chance that a cat mention gets a cat fact
    #[serde(default = "default_catfacts_chance")]
    pub catfacts_chance: u32,

    /// Percent chance of answering an "-er" word
    #[serde(default = "default_barely_know_her_chance")]
    pub barely_know_her_chance: u32,

    #[serde(default = "default_catfacts_url")]
    pub catfacts_url: String,

    /// Request timeout for handler lookups
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotsConfig {
    /// Comma-separated `bot_id=group_id` pairs provisioned as GroupMe bots
    #[serde(default)]
    pub groupme: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for GroupMeConfig {
    fn default() -> Self {
        Self {
            api_url: default_groupme_api_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for SportsConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            football_url: default_football_url(),
            mens_basketball_url: default_mens_basketball_url(),
            womens_basketball_url: default_womens_basketball_url(),
        }
    }
}

impl Default for HandlersConfig {
    fn default() -> Self {
        Self {
            catfacts_chance: default_catfacts_chance(),
            barely_know_her_chance: default_barely_know_her_chance(),
            catfacts_url: default_catfacts_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl SportsConfig {
    pub fn urls(&self) -> SportsUrls {
        SportsUrls {
            football: self.football_url.clone(),
            mens_basketball: self.mens_basketball_url.clone(),
            womens_basketball: self.womens_basketball_url.clone(),
        }
    }
}

impl BotsConfig {
    /// `(bot_id, group_id)` pairs. Entries without a group id are skipped.
    pub fn groupme_bots(&self) -> Vec<(String, String)> {
        self.groupme
            .split(',')
            .filter_map(|entry| {
                let (bot_id, group_id) = entry.split_once('=')?;
                let (bot_id, group_id) = (bot_id.trim(), group_id.trim());
                (!bot_id.is_empty() && !group_id.is_empty())
                    .then(|| (bot_id.to_string(), group_id.to_string()))
            })
            .collect()
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_groupme_api_url() -> String {
    groupme_client::GROUPME_API_URL.into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_football_url() -> String {
    sports::ESPN_FOOTBALL_URL.into()
}

fn default_mens_basketball_url() -> String {
    sports::ESPN_MENS_BASKETBALL_URL.into()
}

fn default_womens_basketball_url() -> String {
    sports::ESPN_WOMENS_BASKETBALL_URL.into()
}

fn default_catfacts_chance() -> u32 {
    10
}

fn default_barely_know_her_chance() -> u32 {
    35
}

fn default_catfacts_url() -> String {
    "https://catfact.ninja/fact".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
