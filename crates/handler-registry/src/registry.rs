//! Ordered handler registry and message dispatch.

use crate::context::{BotContext, Message, Platform};
use crate::error::RegistryError;
use crate::handler::{
    default_name, Action, Handler, MatchAction, MessageAction, PlainAction, PredicateAction,
};
use regex::RegexBuilder;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Pattern arguments accepted by [`HandlerRegistry::handler`].
pub trait IntoPatterns {
    fn into_patterns(self) -> Vec<String>;
}

impl IntoPatterns for () {
    fn into_patterns(self) -> Vec<String> {
        Vec::new()
    }
}

impl IntoPatterns for &str {
    fn into_patterns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoPatterns for String {
    fn into_patterns(self) -> Vec<String> {
        vec![self]
    }
}

impl<const N: usize> IntoPatterns for [&str; N] {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|p| p.to_string()).collect()
    }
}

impl IntoPatterns for &[&str] {
    fn into_patterns(self) -> Vec<String> {
        self.iter().map(|p| p.to_string()).collect()
    }
}

impl IntoPatterns for Vec<String> {
    fn into_patterns(self) -> Vec<String> {
        self
    }
}

/// A unit of handler definitions registered together at start-up.
pub trait HandlerModule {
    /// Module name, used to avoid loading the same module twice.
    fn name(&self) -> &str;

    fn register(&self, registry: &mut HandlerRegistry) -> Result<(), RegistryError>;
}

/// Criteria for [`HandlerRegistry::get`]. Unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct HandlerCriteria {
    pub name: Option<String>,
    pub platform: Option<Platform>,
    pub on_by_default: Option<bool>,
    pub always_run: Option<bool>,
}

impl HandlerCriteria {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    fn matches(&self, handler: &Handler) -> bool {
        self.name.as_deref().map_or(true, |n| handler.name() == n)
            && self.platform.map_or(true, |p| handler.supports(p))
            && self.on_by_default.map_or(true, |d| handler.on_by_default() == d)
            && self.always_run.map_or(true, |a| handler.always_run() == a)
    }
}

/// Ordered collection of handlers.
///
/// Registration order is also dispatch priority: the first enabled handler
/// that matches wins, except that `always_run` handlers fire regardless.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Vec<Handler>,
    loaded_modules: BTreeSet<String>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start registering a handler for the given patterns.
    ///
    /// Pass `()` for a predicate handler with no patterns.
    pub fn handler(&mut self, patterns: impl IntoPatterns) -> HandlerBuilder<'_> {
        HandlerBuilder {
            registry: self,
            patterns: patterns.into_patterns(),
            name: None,
            description: None,
            case_sensitive: false,
            platforms: None,
            on_by_default: false,
            always_run: false,
        }
    }

    /// Register every module not loaded yet, in order.
    pub fn initialize(&mut self, modules: &[&dyn HandlerModule]) -> Result<(), RegistryError> {
        let initial_count = self.len();

        for module in modules {
            if self.loaded_modules.contains(module.name()) {
                debug!("Already loaded {}", module.name());
                continue;
            }

            let start_count = self.len();
            module.register(self)?;
            info!(
                "Loaded {} handlers from {}",
                self.len() - start_count,
                module.name()
            );
            self.loaded_modules.insert(module.name().to_string());
        }

        info!(
            "Loaded {} new handlers, {} handlers total",
            self.len() - initial_count,
            self.len()
        );
        Ok(())
    }

    /// Only the handlers eligible for `platform`, in registration order.
    pub fn filter(&self, platform: Platform) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self
                .handlers
                .iter()
                .filter(|h| h.supports(platform))
                .cloned()
                .collect(),
            loaded_modules: self.loaded_modules.clone(),
        }
    }

    /// First handler matching all the given criteria.
    pub fn get(&self, criteria: &HandlerCriteria) -> Option<&Handler> {
        self.handlers.iter().find(|h| criteria.matches(h))
    }

    pub fn by_name(&self, name: &str) -> Option<&Handler> {
        self.handlers.iter().find(|h| h.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Handler> {
        self.handlers.iter()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Names of handlers new channels on `platform` get without configuration.
    pub fn default_names(&self, platform: Platform) -> BTreeSet<String> {
        self.handlers
            .iter()
            .filter(|h| h.on_by_default() && h.supports(platform))
            .map(|h| h.name().to_string())
            .collect()
    }

    /// Resolve a message to the handlers that fire for it.
    ///
    /// Returns the names of the handlers that matched, in the order they
    /// fired. At most one handler without `always_run` fires per message.
    pub async fn handle_message(
        &self,
        platform: Platform,
        handler_names: &HashSet<String>,
        context: &dyn BotContext,
        message: &dyn Message,
    ) -> Vec<String> {
        let mut matched_handlers: Vec<String> = Vec::new();

        for handler in &self.handlers {
            if !handler.supports(platform) {
                continue;
            }

            if !handler_names.contains(handler.name()) {
                continue;
            }

            // We already matched at least one handler, don't run this one
            if !matched_handlers.is_empty() && !handler.always_run() {
                continue;
            }

            debug!("Trying message handler {} ...", handler.name());

            let matched = match handler.run(context, message).await {
                Ok(matched) => matched,
                Err(e) => {
                    error!(handler = %handler.name(), "Handler failed: {}", e);
                    // A regex handler only runs its action after a pattern matched.
                    handler.has_patterns()
                }
            };

            if matched {
                matched_handlers.push(handler.name().to_string());
            }
        }

        matched_handlers
    }
}

impl<'a> IntoIterator for &'a HandlerRegistry {
    type Item = &'a Handler;
    type IntoIter = std::slice::Iter<'a, Handler>;

    fn into_iter(self) -> Self::IntoIter {
        self.handlers.iter()
    }
}

/// Builder returned by [`HandlerRegistry::handler`].
///
/// The terminal methods pick the action kind and append the handler.
pub struct HandlerBuilder<'r> {
    registry: &'r mut HandlerRegistry,
    patterns: Vec<String>,
    name: Option<String>,
    description: Option<String>,
    case_sensitive: bool,
    platforms: Option<Vec<String>>,
    on_by_default: bool,
    always_run: bool,
}

impl HandlerBuilder<'_> {
    /// Override the name derived from the action type.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Restrict the handler to these platforms (validated on registration).
    pub fn platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.platforms = Some(
            platforms
                .into_iter()
                .map(|p| p.as_ref().to_string())
                .collect(),
        );
        self
    }

    pub fn on_by_default(mut self, on_by_default: bool) -> Self {
        self.on_by_default = on_by_default;
        self
    }

    pub fn always_run(mut self, always_run: bool) -> Self {
        self.always_run = always_run;
        self
    }

    pub fn plain<A: PlainAction + 'static>(self, action: A) -> Result<(), RegistryError> {
        self.finish(default_name::<A>(), Action::Plain(Arc::new(action)))
    }

    pub fn with_message<A: MessageAction + 'static>(self, action: A) -> Result<(), RegistryError> {
        self.finish(default_name::<A>(), Action::Message(Arc::new(action)))
    }

    pub fn with_match<A: MatchAction + 'static>(self, action: A) -> Result<(), RegistryError> {
        self.finish(default_name::<A>(), Action::Match(Arc::new(action)))
    }

    pub fn predicate<A: PredicateAction + 'static>(self, action: A) -> Result<(), RegistryError> {
        self.finish(default_name::<A>(), Action::Predicate(Arc::new(action)))
    }

    fn finish(self, default_name: String, action: Action) -> Result<(), RegistryError> {
        let platforms = parse_platforms(self.platforms.as_deref())?;
        let name = self.name.unwrap_or(default_name);

        let patterns = self
            .patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(!self.case_sensitive)
                    .build()
                    .map_err(|source| RegistryError::InvalidPattern {
                        name: name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.registry.handlers.push(Handler {
            name,
            description: self.description,
            patterns,
            platforms,
            action,
            on_by_default: self.on_by_default,
            always_run: self.always_run,
        });
        Ok(())
    }
}

fn parse_platforms(platforms: Option<&[String]>) -> Result<BTreeSet<Platform>, RegistryError> {
    let platforms = match platforms {
        Some(p) if !p.is_empty() => p,
        _ => return Ok(Platform::ALL.into_iter().collect()),
    };

    let mut valid = BTreeSet::new();
    let mut invalid = Vec::new();
    for name in platforms {
        match name.parse::<Platform>() {
            Ok(platform) => {
                valid.insert(platform);
            }
            Err(_) => invalid.push(name.to_lowercase()),
        }
    }

    if invalid.is_empty() {
        Ok(valid)
    } else {
        Err(RegistryError::InvalidPlatforms(invalid))
    }
}
