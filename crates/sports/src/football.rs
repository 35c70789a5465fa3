//! Vanderbilt football via the ESPN college-football scoreboard.

use crate::error::SportsError;
use crate::espn::score;
use crate::time::parse_espn_date;
use crate::types::{message_words, Team, VandyResult};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

pub const ESPN_FOOTBALL_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/college-football/scoreboard";

const REGULAR_SEASON: u32 = 2;
const BOWL_SEASON: u32 = 3;

#[derive(Debug, Deserialize)]
struct Scoreboard {
    #[serde(default)]
    events: Vec<FootballEvent>,
}

#[derive(Debug, Deserialize)]
struct FootballEvent {
    date: String,
    #[serde(default)]
    competitions: Vec<Competition>,
    status: EventStatus,
}

#[derive(Debug, Deserialize)]
struct Competition {
    #[serde(default)]
    competitors: Vec<Competitor>,
}

#[derive(Debug, Deserialize)]
struct Competitor {
    team: EspnTeam,
    #[serde(default, deserialize_with = "score")]
    score: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EspnTeam {
    #[serde(default)]
    location: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct EventStatus {
    #[serde(rename = "type")]
    kind: StatusType,
}

#[derive(Debug, Deserialize)]
struct StatusType {
    #[serde(default)]
    completed: bool,
}

impl FootballEvent {
    fn competitors(&self) -> &[Competitor] {
        self.competitions
            .first()
            .map(|c| c.competitors.as_slice())
            .unwrap_or_default()
    }

    fn has_vandy(&self) -> bool {
        self.competitors().iter().any(Competitor::is_vandy)
    }
}

impl Competitor {
    fn is_vandy(&self) -> bool {
        self.team.location == "Vanderbilt"
    }
}

/// Vanderbilt football.
pub struct VandyFootball {
    client: Client,
    scoreboard_url: String,
}

impl VandyFootball {
    pub fn new(client: Client, scoreboard_url: impl Into<String>) -> Self {
        Self {
            client,
            scoreboard_url: scoreboard_url.into(),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_scoreboard(
        &self,
        season_type: u32,
        week: i64,
        year: i32,
    ) -> Result<Option<Scoreboard>, SportsError> {
        let response = self
            .client
            .get(&self.scoreboard_url)
            .query(&[
                ("lang", "en".to_string()),
                ("region", "us".to_string()),
                ("calendartype", "blacklist".to_string()),
                ("limit", "300".to_string()),
                ("dates", year.to_string()),
                ("seasontype", season_type.to_string()),
                ("week", week.to_string()),
                ("groups", "80".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Non-success response from scoreboard");
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    fn result_from_event(
        &self,
        event: &FootballEvent,
    ) -> Result<Option<VandyResult>, SportsError> {
        let (vandy, opponent): (Vec<&Competitor>, Vec<&Competitor>) =
            event.competitors().iter().partition(|c| c.is_vandy());
        let (Some(vandy), Some(opponent)) = (vandy.first(), opponent.first()) else {
            return Ok(None);
        };

        Ok(Some(VandyResult {
            date: parse_espn_date(&event.date)?,
            is_finished: event.status.kind.completed,
            vandy_team: self.name().to_string(),
            vandy_score: vandy.score,
            opponent: opponent.team.display_name.clone(),
            opponent_score: opponent.score,
        }))
    }
}

#[async_trait]
impl Team for VandyFootball {
    fn name(&self) -> &str {
        "Vandy Football"
    }

    fn is_in_season(&self, date: NaiveDate) -> bool {
        date.month() >= 8 || date.month() <= 2
    }

    fn has_match_in_message(&self, message: &str) -> bool {
        message_words(message).iter().any(|w| w == "football")
    }

    async fn get_latest_result(
        &self,
        desired_date: NaiveDate,
    ) -> Result<Option<VandyResult>, SportsError> {
        let Some((season_type, week)) = season_and_week(desired_date) else {
            debug!(%desired_date, "No football lookups outside the season");
            return Ok(None);
        };
        debug!(season_type, week, "Fetching football scoreboard");

        let Some(scoreboard) = self
            .fetch_scoreboard(season_type, week, desired_date.year())
            .await?
        else {
            return Ok(None);
        };

        match scoreboard.events.iter().find(|e| e.has_vandy()) {
            Some(event) => self.result_from_event(event),
            None => {
                info!("Looked through all the events, couldn't find the Vandy game");
                Ok(None)
            }
        }
    }
}

/// Season type and week to query, or `None` from February through July.
pub fn season_and_week(date: NaiveDate) -> Option<(u32, i64)> {
    match date.month() {
        2..=7 => None,
        1 => Some((BOWL_SEASON, 1)),
        12 if date.day() > 11 => Some((BOWL_SEASON, 1)),
        _ => Some((REGULAR_SEASON, get_week(date))),
    }
}

/// Regular-season week number, counting from the Thursday before Labor Day.
pub fn get_week(date: NaiveDate) -> i64 {
    let labor_day = NaiveDate::from_weekday_of_month_opt(date.year(), 9, Weekday::Mon, 1)
        .unwrap_or(date);
    let week_one = labor_day - Duration::days(4);
    (date - week_one).num_days().div_euclid(7) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scoreboard() -> serde_json::Value {
        json!({
            "events": [
                {
                    "date": "2024-10-05T23:00Z",
                    "competitions": [{
                        "competitors": [
                            {"team": {"location": "Kentucky", "displayName": "Kentucky Wildcats"}, "score": "7"},
                            {"team": {"location": "Georgia", "displayName": "Georgia Bulldogs"}, "score": "41"}
                        ]
                    }],
                    "status": {"type": {"completed": true}}
                },
                {
                    "date": "2024-10-05T16:00Z",
                    "competitions": [{
                        "competitors": [
                            {"team": {"location": "Alabama", "displayName": "Alabama Crimson Tide"}, "score": "35"},
                            {"team": {"location": "Vanderbilt", "displayName": "Vanderbilt Commodores"}, "score": "40"}
                        ]
                    }],
                    "status": {"type": {"completed": true}}
                }
            ]
        })
    }

    #[test]
    fn test_get_week() {
        assert_eq!(get_week(date(2024, 9, 1)), 1);
        assert_eq!(get_week(date(2024, 10, 1)), 5);
        assert_eq!(get_week(date(2025, 9, 1)), 1);
    }

    #[test]
    fn test_season_and_week() {
        assert_eq!(season_and_week(date(2024, 3, 15)), None);
        assert_eq!(season_and_week(date(2024, 7, 31)), None);
        assert_eq!(season_and_week(date(2024, 2, 1)), None);
        assert_eq!(season_and_week(date(2025, 1, 2)), Some((BOWL_SEASON, 1)));
        assert_eq!(season_and_week(date(2024, 12, 12)), Some((BOWL_SEASON, 1)));
        assert_eq!(
            season_and_week(date(2024, 12, 11)),
            Some((REGULAR_SEASON, get_week(date(2024, 12, 11))))
        );
        assert_eq!(season_and_week(date(2024, 10, 1)), Some((REGULAR_SEASON, 5)));
    }

    #[test]
    fn test_in_season() {
        let football = VandyFootball::new(Client::new(), ESPN_FOOTBALL_URL);
        assert!(football.is_in_season(date(2024, 8, 1)));
        assert!(football.is_in_season(date(2024, 12, 1)));
        assert!(football.is_in_season(date(2025, 2, 28)));
        assert!(!football.is_in_season(date(2025, 3, 1)));
        assert!(!football.is_in_season(date(2025, 7, 31)));
    }

    #[test]
    fn test_message_match() {
        let football = VandyFootball::new(Client::new(), ESPN_FOOTBALL_URL);
        assert!(football.has_match_in_message("did vandy win at football"));
        assert!(football.has_match_in_message("FOOTBALL?"));
        assert!(!football.has_match_in_message("did vandy win"));
        assert!(!football.has_match_in_message("did vandy win their basketball game"));
    }

    #[tokio::test]
    async fn test_finds_vandy_game() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scoreboard"))
            .and(query_param("dates", "2024"))
            .and(query_param("seasontype", "2"))
            .and(query_param("week", "6"))
            .and(query_param("groups", "80"))
            .respond_with(ResponseTemplate::new(200).set_body_json(scoreboard()))
            .mount(&mock_server)
            .await;

        let football =
            VandyFootball::new(Client::new(), format!("{}/scoreboard", mock_server.uri()));
        let result = football.get_latest_result(date(2024, 10, 5)).await.unwrap();

        assert_eq!(
            result,
            Some(VandyResult {
                date: date(2024, 10, 5),
                is_finished: true,
                vandy_team: "Vandy Football".into(),
                vandy_score: 40,
                opponent: "Alabama Crimson Tide".into(),
                opponent_score: 35,
            })
        );
    }

    #[tokio::test]
    async fn test_no_vandy_game() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scoreboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
            .mount(&mock_server)
            .await;

        let football =
            VandyFootball::new(Client::new(), format!("{}/scoreboard", mock_server.uri()));
        let result = football.get_latest_result(date(2024, 10, 5)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_non_success_is_no_result() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scoreboard"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&mock_server)
            .await;

        let football =
            VandyFootball::new(Client::new(), format!("{}/scoreboard", mock_server.uri()));
        let result = football.get_latest_result(date(2024, 10, 5)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_bad_json_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scoreboard"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let football =
            VandyFootball::new(Client::new(), format!("{}/scoreboard", mock_server.uri()));
        let result = football.get_latest_result(date(2024, 10, 5)).await;
        assert!(matches!(result, Err(SportsError::Json(_))));
    }

    #[tokio::test]
    async fn test_offseason_skips_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(scoreboard()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let football =
            VandyFootball::new(Client::new(), format!("{}/scoreboard", mock_server.uri()));
        let result = football.get_latest_result(date(2024, 5, 5)).await.unwrap();
        assert!(result.is_none());
    }
}
