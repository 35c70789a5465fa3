//! ESPN team schedule pages.
//!
//! The schedule is not served as an API. The page embeds its state as a
//! JSON object assigned to `window['__espnfitt__']`, which is cut out of
//! the HTML and read directly.

use crate::error::SportsError;
use crate::espn::score;
use crate::time::parse_espn_date;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

const DATA_START_MARKER: &str = "window['__espnfitt__']";

// The schedule page refuses requests without a familiar user agent.
const SCHEDULE_USER_AGENT: &str = "curl/8.7.1";

/// A game on a team schedule, with its date in US/Central.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEvent {
    pub date: NaiveDate,
    pub opponent: String,
    pub team_score: u32,
    pub opponent_score: u32,
    pub is_finished: bool,
}

#[derive(Debug, Deserialize)]
struct PageState {
    page: Page,
}

#[derive(Debug, Deserialize)]
struct Page {
    content: PageContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageContent {
    schedule_data: ScheduleData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleData {
    #[serde(default)]
    team_schedule: Vec<SeasonSchedule>,
}

#[derive(Debug, Deserialize)]
struct SeasonSchedule {
    // Keyed by phase, e.g. "pre" and "post", read in key order.
    #[serde(default)]
    events: BTreeMap<String, Vec<RawEvent>>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    date: RawDate,
    opponent: RawOpponent,
    #[serde(default)]
    result: RawResult,
    #[serde(default)]
    status: RawStatus,
}

#[derive(Debug, Deserialize)]
struct RawDate {
    date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOpponent {
    display_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResult {
    #[serde(default, deserialize_with = "score")]
    current_team_score: u32,
    #[serde(default, deserialize_with = "score")]
    opponent_team_score: u32,
}

#[derive(Debug, Default, Deserialize)]
struct RawStatus {
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    state: Option<String>,
}

impl RawEvent {
    fn into_event(self) -> Result<ScheduleEvent, SportsError> {
        let is_finished = self.status.completed || self.status.state.as_deref() == Some("post");
        Ok(ScheduleEvent {
            date: parse_espn_date(&self.date.date)?,
            opponent: self.opponent.display_name,
            team_score: self.result.current_team_score,
            opponent_score: self.result.opponent_team_score,
            is_finished,
        })
    }
}

/// Download a schedule page. Non-success responses are logged and yield
/// `None`.
#[instrument(skip(client))]
pub async fn fetch_schedule_page(
    client: &Client,
    url: &str,
) -> Result<Option<String>, SportsError> {
    let response = client
        .get(url)
        .header(ACCEPT, "*/*")
        .header(USER_AGENT, SCHEDULE_USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "Non-success response from schedule page");
        return Ok(None);
    }

    Ok(Some(response.text().await?))
}

/// Every event on every season of the schedule embedded in `html`.
pub fn read_schedule_events(html: &str) -> Result<Vec<ScheduleEvent>, SportsError> {
    let state: PageState = serde_json::from_str(extract_page_state(html)?)?;

    let events = state
        .page
        .content
        .schedule_data
        .team_schedule
        .into_iter()
        .flat_map(|season| season.events.into_values().flatten())
        .map(RawEvent::into_event)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = events.len(), "Read schedule events");
    Ok(events)
}

/// The latest event on or before `desired_date`, or `None` when every
/// event is later. On a shared date a finished event wins, then the one
/// listed first.
pub fn find_most_recent_event(
    events: &[ScheduleEvent],
    desired_date: NaiveDate,
) -> Option<&ScheduleEvent> {
    events
        .iter()
        .filter(|e| e.date <= desired_date)
        .rev()
        .max_by_key(|e| (e.date, e.is_finished))
}

fn extract_page_state(html: &str) -> Result<&str, SportsError> {
    let missing = |what: &str| SportsError::SchedulePage(format!("could not find {what}"));

    let marker = html
        .find(DATA_START_MARKER)
        .ok_or_else(|| missing("the page state marker"))?;
    let after_marker = &html[marker..];

    let start = after_marker
        .find('{')
        .ok_or_else(|| missing("the start of the page state"))?;
    let script_end = after_marker
        .find("</script>")
        .ok_or_else(|| missing("the end of the page state script"))?;
    let end = after_marker[..script_end]
        .rfind('}')
        .ok_or_else(|| missing("the end of the page state"))?;

    if end < start {
        return Err(missing("a complete page state object"));
    }
    Ok(&after_marker[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule_page(events: serde_json::Value) -> String {
        let state = json!({
            "page": {
                "content": {
                    "scheduleData": {"teamSchedule": [{"events": {"post": events}}]}
                }
            }
        });
        format!(
            "<html>\n  <script>\n    window['CONFIG']={{\"config\": \"a\"}};\n    \
             window['__espnfitt__']={state};\n  </script>\n</html>"
        )
    }

    fn simple_events() -> serde_json::Value {
        json!([{
            "date": {"date": "2024-11-14T22:00Z"},
            "opponent": {
                "id": "25",
                "abbrev": "CAL",
                "displayName": "California Golden Bears"
            },
            "result": {
                "winner": true,
                "winLossSymbol": "W",
                "currentTeamScore": "85",
                "opponentTeamScore": "69"
            },
            "status": {"name": "STATUS_FINAL", "state": "post", "completed": true}
        }])
    }

    fn sample_events() -> Vec<ScheduleEvent> {
        [
            (date(2024, 1, 1), "Western KenSUCK-y", true),
            (date(2024, 3, 1), "Presbyterian Blue Hoes", true),
            (date(2024, 6, 1), "One of the 3 SEC Tiger schools", true),
            (date(2024, 6, 2), "The Refs", false),
        ]
        .into_iter()
        .map(|(date, opponent, won)| ScheduleEvent {
            date,
            opponent: opponent.into(),
            team_score: 50,
            opponent_score: if won { 40 } else { 60 },
            is_finished: true,
        })
        .collect()
    }

    #[test]
    fn test_read_simple_events() {
        let events = read_schedule_events(&schedule_page(simple_events())).unwrap();

        assert_eq!(
            events,
            vec![ScheduleEvent {
                date: date(2024, 11, 14),
                opponent: "California Golden Bears".into(),
                team_score: 85,
                opponent_score: 69,
                is_finished: true,
            }]
        );
    }

    #[test]
    fn test_weird_time_events() {
        let page = schedule_page(json!([{
            "date": {"date": "2024-12-25T01:00Z"},
            "opponent": {"displayName": "California Golden Bears"},
            "result": {"currentTeamScore": "85", "opponentTeamScore": "69"},
            "status": {"name": "STATUS_FINAL", "state": "post", "completed": true}
        }]));

        let events = read_schedule_events(&page).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, date(2024, 12, 24));
    }

    #[test]
    fn test_upcoming_event_without_scores() {
        let page = schedule_page(json!([{
            "date": {"date": "2025-02-15T18:00Z"},
            "opponent": {"displayName": "Auburn Tigers"},
            "status": {"state": "pre"}
        }]));

        let events = read_schedule_events(&page).unwrap();
        assert_eq!(events[0].team_score, 0);
        assert_eq!(events[0].opponent_score, 0);
        assert!(!events[0].is_finished);
    }

    #[test]
    fn test_events_across_seasons_and_phases() {
        let page = format!(
            "<script>window['__espnfitt__']={};</script>",
            json!({
                "page": {"content": {"scheduleData": {"teamSchedule": [
                    {"events": {
                        "pre": [{"date": {"date": "2024-11-04T01:00Z"}, "opponent": {"displayName": "A"}}],
                        "post": [{"date": {"date": "2024-11-10T18:00Z"}, "opponent": {"displayName": "B"}}]
                    }},
                    {"events": {
                        "post": [{"date": {"date": "2025-02-11T00:00Z"}, "opponent": {"displayName": "C"}}]
                    }}
                ]}}}
            })
        );

        let mut dates: Vec<_> = read_schedule_events(&page)
            .unwrap()
            .into_iter()
            .map(|e| e.date)
            .collect();
        dates.sort();

        assert_eq!(
            dates,
            vec![date(2024, 11, 3), date(2024, 11, 10), date(2025, 2, 10)]
        );
    }

    #[test]
    fn test_missing_marker() {
        let result = read_schedule_events("<html><script>window['CONFIG']={}</script></html>");
        assert!(matches!(result, Err(SportsError::SchedulePage(_))));
    }

    #[test]
    fn test_truncated_page() {
        let result = read_schedule_events("<script>window['__espnfitt__']={\"page\": ");
        assert!(matches!(result, Err(SportsError::SchedulePage(_))));
    }

    #[test]
    fn test_find_recent_event() {
        let events = sample_events();
        let cases = [
            (date(2024, 2, 1), date(2024, 1, 1)),
            (date(2024, 8, 1), date(2024, 6, 2)),
            (date(2024, 3, 1), date(2024, 3, 1)),
            (date(2024, 6, 1), date(2024, 6, 1)),
            (date(2024, 6, 2), date(2024, 6, 2)),
        ];

        for (desired, expected) in cases {
            let event = find_most_recent_event(&events, desired).unwrap();
            assert_eq!(event.date, expected, "desired {desired}");
        }
    }

    #[test]
    fn test_find_recent_event_from_unordered() {
        let mut events = sample_events();
        events.reverse();
        events.swap(0, 2);

        let event = find_most_recent_event(&events, date(2024, 2, 1)).unwrap();
        assert_eq!(event.opponent, "Western KenSUCK-y");
    }

    #[test]
    fn test_find_recent_event_same_day() {
        let event = |opponent: &str, is_finished| ScheduleEvent {
            date: date(2024, 3, 9),
            opponent: opponent.into(),
            team_score: 0,
            opponent_score: 0,
            is_finished,
        };

        let events = [event("Later Game", false), event("Early Game", true)];
        let found = find_most_recent_event(&events, date(2024, 3, 9)).unwrap();
        assert_eq!(found.opponent, "Early Game");

        let events = [event("First", true), event("Second", true)];
        let found = find_most_recent_event(&events, date(2024, 3, 10)).unwrap();
        assert_eq!(found.opponent, "First");
    }

    #[test]
    fn test_phases_read_in_order() {
        let page = format!(
            "<script>window['__espnfitt__']={};</script>",
            json!({
                "page": {"content": {"scheduleData": {"teamSchedule": [
                    {"events": {
                        "pre": [{"date": {"date": "2024-03-09T18:00Z"}, "opponent": {"displayName": "Pre"}}],
                        "post": [{"date": {"date": "2024-03-09T18:00Z"}, "opponent": {"displayName": "Post"}}]
                    }}
                ]}}}
            })
        );

        let opponents: Vec<_> = read_schedule_events(&page)
            .unwrap()
            .into_iter()
            .map(|e| e.opponent)
            .collect();
        assert_eq!(opponents, vec!["Post", "Pre"]);
    }

    #[test]
    fn test_find_recent_event_none_before() {
        assert!(find_most_recent_event(&sample_events(), date(2023, 1, 1)).is_none());
        assert!(find_most_recent_event(&[], date(2023, 1, 1)).is_none());
    }

    #[tokio::test]
    async fn test_fetch_sends_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/schedule"))
            .and(header("user-agent", "curl/8.7.1"))
            .and(header("accept", "*/*"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/schedule", mock_server.uri());
        let page = fetch_schedule_page(&Client::new(), &url).await.unwrap();
        assert_eq!(page.as_deref(), Some("<html></html>"));
    }

    #[tokio::test]
    async fn test_fetch_non_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let url = format!("{}/schedule", mock_server.uri());
        let page = fetch_schedule_page(&Client::new(), &url).await.unwrap();
        assert!(page.is_none());
    }
}
