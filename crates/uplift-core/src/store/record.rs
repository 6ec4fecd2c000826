//! Upgrade record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::quality::Quality;

/// Best-known quality for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRecord {
    /// Case-folded identifier, unique.
    pub identifier: String,
    /// Title of the item that set the current quality.
    pub title: String,
    /// Best quality seen. Only ever raised.
    pub quality: Quality,
    /// When the record was created or last raised.
    pub added_at: DateTime<Utc>,
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpsertOutcome {
    /// No record existed; one was created.
    Inserted,
    /// The stored quality was raised.
    Upgraded,
    /// The stored quality was equal or better; nothing changed.
    Unchanged,
}

impl std::fmt::Display for UpgradeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} ({})",
            self.identifier,
            self.quality,
            self.title,
            self.added_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
