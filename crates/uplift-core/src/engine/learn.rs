//! Learn phase: fold accepted entries back into the store.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{LearnReport, UpgradeEngine};
use crate::error::UpliftResult;
use crate::grouping::group_entries;
use crate::store::{UpgradeStore, UpsertOutcome};
use crate::traits::Entry;
use crate::types::Batch;

/// The best entry among `positions`; the earliest wins ties.
fn best_entry<'a, E: Entry>(entries: &'a [E], positions: &[usize]) -> Option<&'a E> {
    positions
        .iter()
        .map(|&i| &entries[i])
        .reduce(|best, entry| if entry.quality() > best.quality() { entry } else { best })
}

impl<S: UpgradeStore> UpgradeEngine<S> {
    /// Run the learn phase over the accepted entries of a batch.
    pub fn learn<E: Entry>(&self, batch: &Batch<E>) -> UpliftResult<LearnReport> {
        self.learn_at(batch, Utc::now())
    }

    /// [`learn`](Self::learn) with an explicit timestamp for new and raised
    /// records.
    pub fn learn_at<E: Entry>(&self, batch: &Batch<E>, now: DateTime<Utc>) -> UpliftResult<LearnReport> {
        if !self.config.tracking {
            debug!("Tracking disabled, nothing to learn");
            return Ok(LearnReport::default());
        }

        let groups = group_entries(batch.accepted(), &self.config.identified_by);
        let mut report = LearnReport {
            groups: groups.len(),
            dropped: groups.dropped(),
            ..LearnReport::default()
        };
        if groups.is_empty() {
            return Ok(report);
        }

        let entries = batch.entries();
        let identifiers = groups.identifiers();
        self.store.with_transaction(|repo| {
            let existing = repo.fetch_many(&identifiers)?;

            for (identifier, positions) in groups.iter() {
                let Some(best) = best_entry(entries, positions) else {
                    continue;
                };
                let quality = best.quality();

                if let Some(record) = existing.get(identifier) {
                    if record.quality >= quality {
                        report.unchanged += 1;
                        continue;
                    }
                }

                match repo.upsert(identifier, quality, best.title(), now)? {
                    UpsertOutcome::Inserted => report.created += 1,
                    UpsertOutcome::Upgraded => report.upgraded += 1,
                    UpsertOutcome::Unchanged => report.unchanged += 1,
                }
                debug!(identifier, %quality, "Tracking upgrade");
            }
            Ok(())
        })?;

        info!(
            groups = report.groups,
            created = report.created,
            upgraded = report.upgraded,
            unchanged = report.unchanged,
            "Upgrade learn finished"
        );
        Ok(report)
    }
}
