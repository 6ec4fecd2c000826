//! The upgrade engine: filter and learn phases over an [`UpgradeStore`].
//!
//! ```ignore
//! let config = UpgradeConfig::from_file("upgrade.toml")?.prepare()?.expect("enabled");
//! let engine = UpgradeEngine::new(SqliteUpgradeStore::new("upgrade.db")?, config);
//!
//! engine.filter(&mut batch)?;
//! // ... the pipeline finalizes acceptance ...
//! engine.learn(&batch)?;
//! ```

mod action;
mod filter;
mod learn;

pub use action::LowerAction;
pub use filter::{
    decide_group, lower_entries, GroupDecision, REASON_LOWER_THAN_ENTRIES,
    REASON_LOWER_THAN_EXISTING, REASON_UPGRADED,
};

use serde::{Deserialize, Serialize};

use crate::config::PreparedConfig;
use crate::store::UpgradeStore;

/// Runs the upgrade phases against a store with one prepared configuration.
pub struct UpgradeEngine<S> {
    store: S,
    config: PreparedConfig,
}

impl<S: UpgradeStore> UpgradeEngine<S> {
    pub fn new(store: S, config: PreparedConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PreparedConfig {
        &self.config
    }
}

/// Summary of one filter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Identifier groups in the batch.
    pub groups: usize,
    /// Entries without an identifier.
    pub dropped: usize,
    /// Groups with a tracked record.
    pub tracked: usize,
    /// Groups skipped because the record already meets the target.
    pub at_target: usize,
    /// Groups with nothing inside the target.
    pub no_candidates: usize,
    /// Entries accepted as upgrades.
    pub upgraded: usize,
    /// Entries given the `on_lower` action.
    pub lower_actioned: usize,
}

/// Summary of one learn run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnReport {
    /// Identifier groups among accepted entries.
    pub groups: usize,
    /// Accepted entries without an identifier.
    pub dropped: usize,
    pub created: usize,
    pub upgraded: usize,
    pub unchanged: usize,
}
