//! Vanderbilt men's and women's basketball via ESPN schedule pages.

use crate::error::SportsError;
use crate::schedule::{fetch_schedule_page, find_most_recent_event, read_schedule_events};
use crate::types::{message_words, Team, VandyResult};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use tracing::info;

pub const ESPN_MENS_BASKETBALL_URL: &str =
    "https://www.espn.com/mens-college-basketball/team/schedule/_/id/238/vanderbilt-commodores";
pub const ESPN_WOMENS_BASKETBALL_URL: &str =
    "https://www.espn.com/womens-college-basketball/team/schedule/_/id/238";

const MENS_WORDS: &[&str] = &["mbb", "men", "men's", "mens"];
const WOMENS_WORDS: &[&str] = &["wbb", "women", "women's", "womens"];

fn basketball_in_season(date: NaiveDate) -> bool {
    date.month() > 10 || date.month() < 5
}

/// Whether the message names this side explicitly, or asks about
/// basketball without naming the other side.
fn asks_about(message: &str, own: &[&str], other: &[&str]) -> bool {
    let words = message_words(message);
    let mentions = |set: &[&str]| words.iter().any(|w| set.contains(&w.as_str()));

    mentions(own) || (words.iter().any(|w| w == "basketball") && !mentions(other))
}

async fn latest_schedule_result(
    client: &Client,
    url: &str,
    team_name: &str,
    desired_date: NaiveDate,
) -> Result<Option<VandyResult>, SportsError> {
    info!(team = team_name, "Retrieving latest basketball event");

    let Some(page) = fetch_schedule_page(client, url).await? else {
        return Ok(None);
    };
    let events = read_schedule_events(&page)?;

    let Some(event) = find_most_recent_event(&events, desired_date) else {
        info!(team = team_name, "No recent events found");
        return Ok(None);
    };
    info!(team = team_name, date = %event.date, "Found most recent event");

    Ok(Some(VandyResult {
        date: event.date,
        is_finished: event.is_finished,
        vandy_team: team_name.to_string(),
        vandy_score: event.team_score,
        opponent: event.opponent.clone(),
        opponent_score: event.opponent_score,
    }))
}

/// Vanderbilt men's basketball.
pub struct MensBasketball {
    client: Client,
    schedule_url: String,
}

impl MensBasketball {
    pub fn new(client: Client, schedule_url: impl Into<String>) -> Self {
        Self {
            client,
            schedule_url: schedule_url.into(),
        }
    }
}

#[async_trait]
impl Team for MensBasketball {
    fn name(&self) -> &str {
        "Vandy Men's Basketball"
    }

    fn is_in_season(&self, date: NaiveDate) -> bool {
        basketball_in_season(date)
    }

    fn has_match_in_message(&self, message: &str) -> bool {
        asks_about(message, MENS_WORDS, WOMENS_WORDS)
    }

    async fn get_latest_result(
        &self,
        desired_date: NaiveDate,
    ) -> Result<Option<VandyResult>, SportsError> {
        latest_schedule_result(&self.client, &self.schedule_url, self.name(), desired_date).await
    }
}

/// Vanderbilt women's basketball.
pub struct WomensBasketball {
    client: Client,
    schedule_url: String,
}

impl WomensBasketball {
    pub fn new(client: Client, schedule_url: impl Into<String>) -> Self {
        Self {
            client,
            schedule_url: schedule_url.into(),
        }
    }
}

#[async_trait]
impl Team for WomensBasketball {
    fn name(&self) -> &str {
        "Vandy Women's Basketball"
    }

    fn is_in_season(&self, date: NaiveDate) -> bool {
        basketball_in_season(date)
    }

    fn has_match_in_message(&self, message: &str) -> bool {
        asks_about(message, WOMENS_WORDS, MENS_WORDS)
    }

    async fn get_latest_result(
        &self,
        desired_date: NaiveDate,
    ) -> Result<Option<VandyResult>, SportsError> {
        latest_schedule_result(&self.client, &self.schedule_url, self.name(), desired_date).await
    }
}
