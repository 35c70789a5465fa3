//! Game results and the per-sport team capability.

use crate::error::SportsError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

/// One Vanderbilt team's game on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VandyResult {
    pub date: NaiveDate,
    pub is_finished: bool,
    pub vandy_team: String,
    pub vandy_score: u32,
    pub opponent: String,
    pub opponent_score: u32,
}

impl VandyResult {
    pub fn is_win(&self) -> bool {
        self.is_finished && self.vandy_score > self.opponent_score
    }

    pub fn is_loss(&self) -> bool {
        self.is_finished && self.vandy_score < self.opponent_score
    }
}

/// A Vanderbilt team whose latest result can be looked up.
#[async_trait]
pub trait Team: Send + Sync {
    /// Display name, e.g. "Vandy Football".
    fn name(&self) -> &str;

    fn is_in_season(&self, date: NaiveDate) -> bool;

    /// Whether the message explicitly asks about this team.
    fn has_match_in_message(&self, message: &str) -> bool;

    /// Latest game on or before `desired_date`, if one can be found.
    async fn get_latest_result(
        &self,
        desired_date: NaiveDate,
    ) -> Result<Option<VandyResult>, SportsError>;
}

/// Lowercased words of a chat message. Apostrophes stay inside words so
/// "men's" and "vandy's" come through whole.
pub(crate) fn message_words(message: &str) -> Vec<String> {
    message
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .filter(|w| !w.is_empty())
        .map(|w| w.replace('\u{2019}', "'").to_lowercase())
        .collect()
}
