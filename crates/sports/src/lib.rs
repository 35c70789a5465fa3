//! Vanderbilt game results from ESPN.
//!
//! Each sport has its own [`Team`] provider. [`DoresReporter`] picks the
//! teams a message asks about (or whoever is in season), looks up their
//! latest games and phrases the outcome.

mod basketball;
mod error;
mod espn;
mod football;
mod schedule;
mod the_dores;
mod time;
mod types;

use reqwest::Client;
use std::sync::Arc;

pub use basketball::{
    MensBasketball, WomensBasketball, ESPN_MENS_BASKETBALL_URL, ESPN_WOMENS_BASKETBALL_URL,
};
pub use error::SportsError;
pub use espn::build_client;
pub use football::{get_week, season_and_week, VandyFootball, ESPN_FOOTBALL_URL};
pub use schedule::{find_most_recent_event, read_schedule_events, ScheduleEvent};
pub use the_dores::{
    build_message_response, determine_teams_for_lookup, filter_team_results, sort_team_results,
    DoresReporter, Phrasebook, STALENESS_DAYS,
};
pub use time::{central_date, parse_espn_date, CENTRAL_TIME};
pub use types::{Team, VandyResult};

/// Upstream locations for each team.
#[derive(Debug, Clone)]
pub struct SportsUrls {
    pub football: String,
    pub mens_basketball: String,
    pub womens_basketball: String,
}

impl Default for SportsUrls {
    fn default() -> Self {
        Self {
            football: ESPN_FOOTBALL_URL.to_string(),
            mens_basketball: ESPN_MENS_BASKETBALL_URL.to_string(),
            womens_basketball: ESPN_WOMENS_BASKETBALL_URL.to_string(),
        }
    }
}

/// Football, men's basketball and women's basketball, sharing one client.
pub fn vandy_teams(client: Client, urls: &SportsUrls) -> Vec<Arc<dyn Team>> {
    vec![
        Arc::new(VandyFootball::new(client.clone(), urls.football.clone())),
        Arc::new(MensBasketball::new(client.clone(), urls.mens_basketball.clone())),
        Arc::new(WomensBasketball::new(client, urls.womens_basketball.clone())),
    ]
}
