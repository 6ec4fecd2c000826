//! In-process upgrade store.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{UpgradeRecord, UpgradeRepository, UpgradeStore, UpsertOutcome};
use crate::error::{ErrorCode, UpliftError, UpliftResult};
use crate::quality::Quality;

/// Upgrade store kept in memory.
///
/// A transaction works on a staged copy of the records which replaces the
/// committed state only when the transaction closure succeeds.
#[derive(Default)]
pub struct MemoryUpgradeStore {
    records: Mutex<HashMap<String, UpgradeRecord>>,
}

impl MemoryUpgradeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> UpliftResult<MutexGuard<'_, HashMap<String, UpgradeRecord>>> {
        self.records.lock().map_err(|e| UpliftError::Database {
            message: e.to_string(),
            code: ErrorCode::DbConnectionFailed,
            source: None,
        })
    }
}

struct StagedRepository {
    staged: RefCell<HashMap<String, UpgradeRecord>>,
}

impl UpgradeRepository for StagedRepository {
    fn fetch_many(&self, identifiers: &BTreeSet<String>) -> UpliftResult<HashMap<String, UpgradeRecord>> {
        let staged = self.staged.borrow();
        Ok(identifiers
            .iter()
            .filter_map(|id| staged.get(id).map(|r| (id.clone(), r.clone())))
            .collect())
    }

    fn upsert(
        &self,
        identifier: &str,
        quality: Quality,
        title: &str,
        now: DateTime<Utc>,
    ) -> UpliftResult<UpsertOutcome> {
        let mut staged = self.staged.borrow_mut();
        let outcome = match staged.get(identifier) {
            None => UpsertOutcome::Inserted,
            Some(existing) if quality > existing.quality => UpsertOutcome::Upgraded,
            Some(_) => return Ok(UpsertOutcome::Unchanged),
        };
        staged.insert(
            identifier.to_string(),
            UpgradeRecord {
                identifier: identifier.to_string(),
                title: title.to_string(),
                quality,
                added_at: now,
            },
        );
        Ok(outcome)
    }
}

impl UpgradeStore for MemoryUpgradeStore {
    fn with_transaction<T, F>(&self, f: F) -> UpliftResult<T>
    where
        F: FnOnce(&dyn UpgradeRepository) -> UpliftResult<T>,
    {
        let mut records = self.lock()?;
        let repo = StagedRepository {
            staged: RefCell::new(records.clone()),
        };
        let value = f(&repo)?;
        *records = repo.staged.into_inner();
        Ok(value)
    }

    fn get(&self, identifier: &str) -> UpliftResult<Option<UpgradeRecord>> {
        Ok(self.lock()?.get(&identifier.to_lowercase()).cloned())
    }

    fn list(&self) -> UpliftResult<Vec<UpgradeRecord>> {
        let mut records: Vec<UpgradeRecord> = self.lock()?.values().cloned().collect();
        records.sort_by(|a, b| {
            b.added_at
                .cmp(&a.added_at)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        Ok(records)
    }

    fn forget(&self, identifier: &str) -> UpliftResult<bool> {
        Ok(self.lock()?.remove(&identifier.to_lowercase()).is_some())
    }

    fn clear(&self) -> UpliftResult<usize> {
        let mut records = self.lock()?;
        let count = records.len();
        records.clear();
        Ok(count)
    }

    fn count(&self) -> UpliftResult<usize> {
        Ok(self.lock()?.len())
    }
}
