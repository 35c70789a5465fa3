//! General-purpose banter.

use super::{Chance, Reply};
use crate::config::HandlersConfig;
use async_trait::async_trait;
use chrono::Timelike;
use handler_registry::{
    BotContext, Content, HandlerError, HandlerModule, HandlerRegistry, HandlerResult, Message,
    PlainAction, PredicateAction, RegistryError,
};
use rand::seq::SliceRandom;
use reqwest::Client;
use serde::Deserialize;
use sports::CENTRAL_TIME;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

const ER_WORDS: &str = include_str!("../../resources/er_words.txt");

const EMOJIS: [&str; 5] = [
    "\u{1f44c}",
    "\u{1f64f}",
    "\u{1f64c}",
    "\u{1f64b}\u{200d}\u{2642}\u{fe0f}",
    "\u{1f64b}\u{200d}\u{2640}\u{fe0f}",
];

/// Quip templates. `{match}` is the matched word, `<person>` mentions the sender.
const QUIPS: [(&str, &[&str]); 13] = [
    ("Barely know her", &EMOJIS),
    ("{match}? I barely know her!", &EMOJIS),
    ("{match}? Nice one <person>!", &EMOJIS),
    ("{match}? High fives all around!!!", RAISED_HANDS),
    ("LOLOLOL {match}", &EMOJIS),
    ("Props to <person>, I barely know her though", &EMOJIS),
    ("heh heh heh {match}", &EMOJIS),
    ("{match}?! wowwww <person>", &EMOJIS),
    ("Idk, <person>, I don't know her well enough to {match}", &EMOJIS),
    ("Gimme 5 <person>!", RAISED_HANDS),
    ("{match}? Brian would be proud", &EMOJIS),
    ("Dang <person>, I barely know her", &EMOJIS),
    ("{match}? Come on, <person> don't leave me hangin", RAISED_HANDS),
];

const RAISED_HANDS: &[&str] = &[EMOJIS[3], EMOJIS[4]];

pub struct GeneralModule {
    catfacts: Catfacts,
    barely_know_her_chance: Chance,
}

impl GeneralModule {
    pub fn new(config: &HandlersConfig, client: Client) -> Self {
        Self {
            catfacts: Catfacts::new(
                client,
                config.catfacts_url.clone(),
                Chance::percent(config.catfacts_chance),
            ),
            barely_know_her_chance: Chance::percent(config.barely_know_her_chance),
        }
    }
}

impl HandlerModule for GeneralModule {
    fn name(&self) -> &str {
        "general"
    }

    fn register(&self, registry: &mut HandlerRegistry) -> Result<(), RegistryError> {
        registry
            .handler("you suck")
            .name("you_suck_too_coach")
            .description("Sends 'YOU SUCK TOO COACH'")
            .plain(Reply("YOU SUCK TOO COACH"))?;

        registry
            .handler("cat")
            .name("catfacts")
            .description("Sends catfacts!")
            .plain(self.catfacts.clone())?;

        registry
            .handler("lit fam")
            .name("lit")
            .description("Battle with the lit bot")
            .plain(Reply("You're not lit, I'm lit"))?;

        registry
            .handler("@saucerbot")
            .name("dont_at_me")
            .description("@saucerbot - Don't @ me 🙄")
            .case_sensitive(true)
            .on_by_default(true)
            .plain(Reply("don't @ me 🙄"))?;

        registry
            .handler(["@saucerbot", "@ saucerbot"])
            .name("sneaky")
            .description("Handle other @saucerbot variants")
            .on_by_default(true)
            .plain(Reply("you think you're sneaky don't you"))?;

        registry
            .handler(())
            .description("I barely know her!")
            .predicate(BarelyKnowHer::new(self.barely_know_her_chance))?;

        registry
            .handler(["69", "sixty-nine", "sixty nine"])
            .name("teenage_saucerbot")
            .description("69")
            .on_by_default(true)
            .plain(Reply("Nice 👌"))?;

        registry
            .handler(())
            .description("It's too early for thai")
            .predicate(TooEarlyForThai::new())?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatFact {
    fact: String,
}

/// Sometimes answers a cat mention with a fact from the cat facts API.
#[derive(Clone)]
pub struct Catfacts {
    client: Client,
    url: String,
    chance: Chance,
}

impl Catfacts {
    pub fn new(client: Client, url: String, chance: Chance) -> Self {
        Self { client, url, chance }
    }

    async fn fetch(&self) -> Result<String, reqwest::Error> {
        let fact: CatFact = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(fact.fact)
    }
}

#[async_trait]
impl PlainAction for Catfacts {
    async fn call(&self, context: &dyn BotContext) -> HandlerResult<()> {
        if !self.chance.roll() {
            return Ok(());
        }

        let fact = self
            .fetch()
            .await
            .map_err(|e| HandlerError::Upstream(e.to_string()))?;
        context.post(fact.into()).await
    }
}

/// Replies to words ending in "-er" with a quip.
pub struct BarelyKnowHer {
    words: HashSet<String>,
    chance: Chance,
}

impl BarelyKnowHer {
    pub fn new(chance: Chance) -> Self {
        Self::with_words(ER_WORDS.lines(), chance)
    }

    pub fn with_words<'a>(words: impl IntoIterator<Item = &'a str>, chance: Chance) -> Self {
        let words = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words, chance }
    }

    /// The longest known word in `text`, earliest first on ties.
    pub fn find_match(&self, text: &str) -> Option<String> {
        let mut best: Option<String> = None;
        for word in text.split(|c: char| !c.is_ascii_alphabetic()) {
            let word = word.to_lowercase();
            if !self.words.contains(&word) {
                continue;
            }
            if best.as_ref().map_or(true, |b| word.len() > b.len()) {
                best = Some(word);
            }
        }
        best
    }
}

/// Fill in a quip template for `word`, mentioning the sender where it says `<person>`.
pub fn build_quip(template: &str, emoji: &str, word: &str, message: &dyn Message) -> Content {
    let quip = template.replace("{match}", word);
    let content = match quip.split_once("<person>") {
        Some((before, after)) => Content::new()
            .text(before)
            .mention(message.user_id(), format!("@{}", message.user_name()))
            .text(after),
        None => Content::new().text(quip.as_str()),
    };
    content.text(format!(" {}", emoji))
}

#[async_trait]
impl PredicateAction for BarelyKnowHer {
    async fn call(&self, context: &dyn BotContext, message: &dyn Message) -> HandlerResult<bool> {
        if message.content().is_empty() || !self.chance.roll() {
            return Ok(false);
        }

        let Some(word) = self.find_match(message.content()) else {
            return Ok(false);
        };

        let quip = {
            let mut rng = rand::thread_rng();
            QUIPS.choose(&mut rng).and_then(|(template, emojis)| {
                emojis
                    .choose(&mut rng)
                    .map(|emoji| build_quip(template, emoji, &word, message))
            })
        };
        let Some(quip) = quip else {
            return Ok(false);
        };

        debug!(word = %word, "Barely know her");
        context.post(quip).await?;
        Ok(true)
    }
}

/// Complains about early-morning thai, once per process.
pub struct TooEarlyForThai {
    posted: AtomicBool,
}

impl TooEarlyForThai {
    pub fn new() -> Self {
        Self {
            posted: AtomicBool::new(false),
        }
    }
}

impl Default for TooEarlyForThai {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredicateAction for TooEarlyForThai {
    async fn call(&self, context: &dyn BotContext, message: &dyn Message) -> HandlerResult<bool> {
        let hour = message.created_at().with_timezone(&CENTRAL_TIME).hour();
        if !(3..8).contains(&hour) {
            return Ok(false);
        }

        if self
            .posted
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(false);
        }

        info!("Too early for thai at {}:00 central", hour);
        context.post("It's too early for thai".into()).await?;
        Ok(true)
    }
}
