//! Channel types.

use chrono::{DateTime, Utc};
use handler_registry::Platform;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A bot installed in one chat group, with the handlers turned on for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotChannel {
    pub bot_id: String,
    pub platform: Platform,
    pub group_id: String,
    pub handlers: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BotChannel {
    pub fn new(
        bot_id: impl Into<String>,
        platform: Platform,
        group_id: impl Into<String>,
        handlers: impl IntoIterator<Item = String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            bot_id: bot_id.into(),
            platform,
            group_id: group_id.into(),
            handlers: handlers.into_iter().collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot of the enabled handler names, as dispatch expects them.
    pub fn enabled_handlers(&self) -> HashSet<String> {
        self.handlers.iter().cloned().collect()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
