//! "Did the Dores win?": pick the teams worth asking about, look up their
//! latest games and turn the results into a message.

use crate::error::SportsError;
use crate::types::{Team, VandyResult};
use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, warn};

/// Results older than this, relative to the desired date, are not reported.
pub const STALENESS_DAYS: i64 = 3;

const SINGLE_TEAM_NAME: &str = "Vandy";

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Sentence templates. Formats may use `{vandy_name}`, `{opponent}`,
/// `{vandy_score}` and `{opponent_score}`.
///
/// Win and loss formats follow an interjection or a conjunction, so they
/// should open with `{vandy_name}` or a lowercase word.
#[derive(Debug, Clone)]
pub struct Phrasebook {
    pub winning_formats: Vec<String>,
    pub losing_formats: Vec<String>,
    pub in_progress_formats: Vec<String>,
    pub in_progress_follow_ups: Vec<String>,
    pub winning_interjections: Vec<String>,
    pub losing_interjections: Vec<String>,
    /// A win following a win.
    pub winning_conjunctions: Vec<String>,
    pub win_after_loss_conjunctions: Vec<String>,
    pub loss_after_win_conjunctions: Vec<String>,
    pub loss_after_loss_conjunctions: Vec<String>,
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self {
            winning_formats: phrases(&[
                "{vandy_name} took down the {opponent} {vandy_score}-{opponent_score}",
                "{vandy_name} rolled past the {opponent} {vandy_score}-{opponent_score}",
                "{vandy_name} wins {vandy_score}-{opponent_score}, the {opponent} stood no chance!",
                "{vandy_name} conquered the {opponent}, prevailing with a score of \
                 {vandy_score}-{opponent_score}",
            ]),
            losing_formats: phrases(&[
                "{vandy_name} was overcome by the {opponent} {opponent_score}-{vandy_score}",
                "{vandy_name} lost {opponent_score}-{vandy_score} to the {opponent}",
            ]),
            in_progress_formats: phrases(&[
                "Time will tell... {vandy_name} is still playing the {opponent}",
                "Waiting on the result of {vandy_name} against the {opponent}!",
                "I don't know yet, but go dores! {vandy_name} is still out there against the {opponent}",
            ]),
            in_progress_follow_ups: phrases(&[
                "{vandy_name} is still playing the {opponent}, so we'll see.",
                "And {vandy_name} is still battling the {opponent}.",
            ]),
            winning_interjections: phrases(&["Hell yeah!", "ATFD!", "Yes!", "Anchor down!"]),
            losing_interjections: phrases(&["Not this time...", "No :(", "Ugh."]),
            winning_conjunctions: phrases(&["And", "Also,", "On top of that,"]),
            win_after_loss_conjunctions: phrases(&["But on the bright side,", "Luckily,"]),
            loss_after_win_conjunctions: phrases(&["Buuut,", "However,"]),
            loss_after_loss_conjunctions: phrases(&["And unfortunately,", "To make matters worse,"]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    // Finished ties are reported with the losing phrases.
    Loss,
    InProgress,
}

impl Outcome {
    fn of(result: &VandyResult) -> Self {
        if !result.is_finished {
            Outcome::InProgress
        } else if result.is_win() {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

fn pick(options: &[String]) -> &str {
    options
        .choose(&mut rand::thread_rng())
        .map(String::as_str)
        .unwrap_or_default()
}

fn fill(template: &str, result: &VandyResult, vandy_name: &str) -> String {
    template
        .replace("{vandy_name}", vandy_name)
        .replace("{opponent}", &result.opponent)
        .replace("{vandy_score}", &result.vandy_score.to_string())
        .replace("{opponent_score}", &result.opponent_score.to_string())
}

fn sentence(lead: &str, body: String) -> String {
    if lead.is_empty() {
        body
    } else {
        format!("{lead} {body}")
    }
}

/// The teams to ask about: those the message names, or every team in
/// season when the message names none.
pub fn determine_teams_for_lookup(
    teams: &[Arc<dyn Team>],
    message: Option<&str>,
    desired_date: NaiveDate,
) -> Vec<Arc<dyn Team>> {
    if let Some(message) = message {
        let requested: Vec<_> = teams
            .iter()
            .filter(|t| t.has_match_in_message(message))
            .cloned()
            .collect();
        if !requested.is_empty() {
            return requested;
        }
    }

    teams
        .iter()
        .filter(|t| t.is_in_season(desired_date))
        .cloned()
        .collect()
}

/// Drop missing lookups and results at least `STALENESS_DAYS` old.
pub fn filter_team_results(
    results: Vec<Option<VandyResult>>,
    desired_date: NaiveDate,
) -> Vec<VandyResult> {
    results
        .into_iter()
        .flatten()
        .filter(|r| desired_date - r.date < Duration::days(STALENESS_DAYS))
        .collect()
}

/// Most reportable first: played before future, wins before the rest,
/// newer before older, finished before in progress.
pub fn sort_team_results(
    mut results: Vec<VandyResult>,
    desired_date: NaiveDate,
) -> Vec<VandyResult> {
    results.sort_by_key(|r| Reverse((r.date <= desired_date, r.is_win(), r.date, r.is_finished)));
    results
}

/// Compose the reply for already sorted results, or `None` when there are
/// none.
pub fn build_message_response(
    results: &[VandyResult],
    phrasebook: &Phrasebook,
) -> Option<String> {
    let (first, rest) = results.split_first()?;

    let primary_name = if rest.is_empty() {
        SINGLE_TEAM_NAME
    } else {
        first.vandy_team.as_str()
    };

    let primary = match Outcome::of(first) {
        Outcome::InProgress => fill(pick(&phrasebook.in_progress_formats), first, primary_name),
        Outcome::Win => sentence(
            pick(&phrasebook.winning_interjections),
            fill(pick(&phrasebook.winning_formats), first, primary_name),
        ),
        Outcome::Loss => sentence(
            pick(&phrasebook.losing_interjections),
            fill(pick(&phrasebook.losing_formats), first, primary_name),
        ),
    };

    let mut sentences = vec![primary];
    let mut previous = Outcome::of(first);
    for result in rest {
        let outcome = Outcome::of(result);
        let name = result.vandy_team.as_str();
        let follow_up = match (previous, outcome) {
            (_, Outcome::InProgress) => {
                fill(pick(&phrasebook.in_progress_follow_ups), result, name)
            }
            (Outcome::Loss, Outcome::Win) => sentence(
                pick(&phrasebook.win_after_loss_conjunctions),
                fill(pick(&phrasebook.winning_formats), result, name),
            ),
            (_, Outcome::Win) => sentence(
                pick(&phrasebook.winning_conjunctions),
                fill(pick(&phrasebook.winning_formats), result, name),
            ),
            (Outcome::Loss, Outcome::Loss) => sentence(
                pick(&phrasebook.loss_after_loss_conjunctions),
                fill(pick(&phrasebook.losing_formats), result, name),
            ),
            (_, Outcome::Loss) => sentence(
                pick(&phrasebook.loss_after_win_conjunctions),
                fill(pick(&phrasebook.losing_formats), result, name),
            ),
        };
        sentences.push(follow_up);
        previous = outcome;
    }

    Some(sentences.join("\n\n"))
}

/// Looks up the latest Vanderbilt results and reports on them.
#[derive(Clone)]
pub struct DoresReporter {
    teams: Vec<Arc<dyn Team>>,
    phrasebook: Arc<Phrasebook>,
}

impl DoresReporter {
    pub fn new(teams: Vec<Arc<dyn Team>>) -> Self {
        Self {
            teams,
            phrasebook: Arc::new(Phrasebook::default()),
        }
    }

    pub fn with_phrasebook(mut self, phrasebook: Phrasebook) -> Self {
        self.phrasebook = Arc::new(phrasebook);
        self
    }

    pub fn teams(&self) -> &[Arc<dyn Team>] {
        &self.teams
    }

    pub fn phrasebook(&self) -> &Phrasebook {
        &self.phrasebook
    }

    /// Report on the teams asked about in `message` (or in season) for a
    /// US/Central `desired_date`. `None` means there is nothing to report.
    pub async fn did_the_dores_win(
        &self,
        message: Option<&str>,
        desired_date: NaiveDate,
    ) -> Result<Option<String>, SportsError> {
        let results = self.latest_results(message, desired_date).await?;
        Ok(build_message_response(&results, &self.phrasebook))
    }

    /// Recent results for the teams to report on, most relevant first.
    ///
    /// A team whose lookup fails is skipped; the error is returned only when
    /// every lookup failed.
    pub async fn latest_results(
        &self,
        message: Option<&str>,
        desired_date: NaiveDate,
    ) -> Result<Vec<VandyResult>, SportsError> {
        let teams = determine_teams_for_lookup(&self.teams, message, desired_date);
        debug!(
            teams = ?teams.iter().map(|t| t.name()).collect::<Vec<_>>(),
            %desired_date,
            "Looking up results"
        );
        if teams.is_empty() {
            return Ok(Vec::new());
        }

        let lookups = join_all(teams.iter().map(|t| t.get_latest_result(desired_date))).await;

        let mut results = Vec::with_capacity(lookups.len());
        let mut first_error = None;
        let mut failures = 0;
        for (team, lookup) in teams.iter().zip(lookups) {
            match lookup {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(team = team.name(), error = %e, "Failed to look up latest result");
                    failures += 1;
                    first_error.get_or_insert(e);
                }
            }
        }
        if failures == teams.len() {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        Ok(sort_team_results(
            filter_team_results(results, desired_date),
            desired_date,
        ))
    }
}
