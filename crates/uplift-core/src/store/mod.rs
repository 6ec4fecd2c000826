//! Persisted best-known quality per identifier.
//!
//! The stages talk to an [`UpgradeStore`] only through
//! [`with_transaction`](UpgradeStore::with_transaction): one fetch followed by
//! any number of upserts, committed when the closure returns `Ok` and rolled
//! back otherwise.

mod memory;
mod record;
mod sqlite;

pub use memory::MemoryUpgradeStore;
pub use record::{UpgradeRecord, UpsertOutcome};
pub use sqlite::SqliteUpgradeStore;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::UpliftResult;
use crate::quality::Quality;

/// Operations available inside one store transaction.
pub trait UpgradeRepository {
    /// Records for the given identifiers. Unknown identifiers are absent from
    /// the result.
    fn fetch_many(&self, identifiers: &BTreeSet<String>) -> UpliftResult<HashMap<String, UpgradeRecord>>;

    /// Insert a record, or raise an existing one when `quality` is strictly
    /// greater than the stored quality. Otherwise the record is untouched.
    fn upsert(
        &self,
        identifier: &str,
        quality: Quality,
        title: &str,
        now: DateTime<Utc>,
    ) -> UpliftResult<UpsertOutcome>;
}

/// Trait for upgrade record storage.
pub trait UpgradeStore: Send + Sync {
    /// Run `f` inside a transaction.
    fn with_transaction<T, F>(&self, f: F) -> UpliftResult<T>
    where
        F: FnOnce(&dyn UpgradeRepository) -> UpliftResult<T>;

    /// Get one record. The identifier is case-folded first.
    fn get(&self, identifier: &str) -> UpliftResult<Option<UpgradeRecord>>;

    /// All records, most recently updated first.
    fn list(&self) -> UpliftResult<Vec<UpgradeRecord>>;

    /// Delete one record. Returns whether it existed.
    fn forget(&self, identifier: &str) -> UpliftResult<bool>;

    /// Delete every record. Returns how many were removed.
    fn clear(&self) -> UpliftResult<usize>;

    /// Count records.
    fn count(&self) -> UpliftResult<usize>;
}

impl<S: UpgradeStore> UpgradeStore for Arc<S> {
    fn with_transaction<T, F>(&self, f: F) -> UpliftResult<T>
    where
        F: FnOnce(&dyn UpgradeRepository) -> UpliftResult<T>,
    {
        (**self).with_transaction(f)
    }

    fn get(&self, identifier: &str) -> UpliftResult<Option<UpgradeRecord>> {
        (**self).get(identifier)
    }

    fn list(&self) -> UpliftResult<Vec<UpgradeRecord>> {
        (**self).list()
    }

    fn forget(&self, identifier: &str) -> UpliftResult<bool> {
        (**self).forget(identifier)
    }

    fn clear(&self) -> UpliftResult<usize> {
        (**self).clear()
    }

    fn count(&self) -> UpliftResult<usize> {
        (**self).count()
    }
}
