//! Filter phase: accept upgrades and act on lower-quality entries.

use tracing::{debug, info};

use super::{FilterReport, UpgradeEngine};
use crate::config::PreparedConfig;
use crate::error::UpliftResult;
use crate::grouping::group_entries;
use crate::quality::Quality;
use crate::store::{UpgradeRecord, UpgradeStore};
use crate::traits::Entry;
use crate::types::Batch;

/// Reason given to an entry accepted as an upgrade.
pub const REASON_UPGRADED: &str = "upgraded quality";
/// Reason given to an entry below the tracked quality.
pub const REASON_LOWER_THAN_EXISTING: &str = "lower than existing quality";
/// Reason given to an entry below the accepted upgrade.
pub const REASON_LOWER_THAN_ENTRIES: &str = "lower quality compared to entries";

/// Decision for one identifier group with a tracked record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupDecision {
    /// The tracked quality already meets or beats the target; leave the
    /// group alone.
    AtTarget,
    /// Nothing in the group is within the target.
    NoCandidates,
    Ranked {
        /// Position of the entry to accept as an upgrade.
        upgrade: Option<usize>,
        /// Positions within the target, best first.
        candidates: Vec<usize>,
    },
}

/// Rank the entries at `positions` against the tracked record.
///
/// Entries of equal quality keep their batch order, so the earliest of
/// several equally good entries is the one proposed as the upgrade.
pub fn decide_group<E: Entry>(
    entries: &[E],
    positions: &[usize],
    record: &UpgradeRecord,
    config: &PreparedConfig,
) -> GroupDecision {
    let mut candidates = positions.to_vec();

    if let Some(target) = &config.target {
        if record.quality > target.nominal_quality() || target.allows(&record.quality) {
            return GroupDecision::AtTarget;
        }
        candidates.retain(|&i| target.allows(&entries[i].quality()));
    }

    if candidates.is_empty() {
        return GroupDecision::NoCandidates;
    }

    // Stable sort, best first.
    candidates.sort_by(|&a, &b| entries[b].quality().cmp(&entries[a].quality()));
    let best = candidates[0];
    let upgrade = (entries[best].quality() > record.quality).then_some(best);

    GroupDecision::Ranked { upgrade, candidates }
}

/// Candidates that get the `on_lower` action, each listed once with its
/// reason.
///
/// `accepted` is the quality of the upgrade that was actually accepted, if
/// any. Above-target entries never show up here: a group whose record
/// already meets the target is [`GroupDecision::AtTarget`].
pub fn lower_entries<E: Entry>(
    entries: &[E],
    candidates: &[usize],
    record: &UpgradeRecord,
    accepted: Option<Quality>,
) -> Vec<(usize, &'static str)> {
    candidates
        .iter()
        .filter_map(|&i| {
            let quality = entries[i].quality();
            if quality < record.quality {
                Some((i, REASON_LOWER_THAN_EXISTING))
            } else if accepted.is_some_and(|best| quality < best) {
                Some((i, REASON_LOWER_THAN_ENTRIES))
            } else {
                None
            }
        })
        .collect()
}

impl<S: UpgradeStore> UpgradeEngine<S> {
    /// Run the filter phase over a batch.
    ///
    /// Only groups with a tracked record are considered, and entries already
    /// rejected or failed take no part. Dispositions are changed in place;
    /// the store is read but never written.
    pub fn filter<E: Entry>(&self, batch: &mut Batch<E>) -> UpliftResult<FilterReport> {
        let live = batch
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.disposition().is_final());
        let groups = group_entries(live, &self.config.identified_by);
        let mut report = FilterReport {
            groups: groups.len(),
            dropped: groups.dropped(),
            ..FilterReport::default()
        };
        if groups.is_empty() {
            return Ok(report);
        }

        let identifiers = groups.identifiers();
        let existing = self.store.with_transaction(|repo| repo.fetch_many(&identifiers))?;
        let action = self.config.on_lower.action();
        let entries = batch.entries_mut();

        for (identifier, positions) in groups.iter() {
            let Some(record) = existing.get(identifier) else {
                continue;
            };
            report.tracked += 1;

            match decide_group(entries, positions, record, &self.config) {
                GroupDecision::AtTarget => {
                    debug!(identifier, quality = %record.quality, "Already at target quality");
                    report.at_target += 1;
                }
                GroupDecision::NoCandidates => {
                    debug!(identifier, "No entries within target");
                    report.no_candidates += 1;
                }
                GroupDecision::Ranked { upgrade, candidates } => {
                    let mut accepted = None;
                    if let Some(i) = upgrade {
                        entries[i].accept(REASON_UPGRADED);
                        if entries[i].is_accepted() {
                            debug!(
                                identifier,
                                from = %record.quality,
                                to = %entries[i].quality(),
                                title = entries[i].title(),
                                "Accepted upgrade"
                            );
                            accepted = Some(entries[i].quality());
                            report.upgraded += 1;
                        } else {
                            debug!(identifier, title = entries[i].title(), "Upgrade was not accepted");
                        }
                    }
                    if let Some(action) = action {
                        for (i, reason) in lower_entries(entries, &candidates, record, accepted) {
                            debug!(identifier, title = entries[i].title(), ?action, reason, "Acting on lower entry");
                            action.apply(&mut entries[i], reason);
                            report.lower_actioned += 1;
                        }
                    }
                }
            }
        }

        info!(
            groups = report.groups,
            tracked = report.tracked,
            upgraded = report.upgraded,
            lower_actioned = report.lower_actioned,
            "Upgrade filter finished"
        );
        Ok(report)
    }
}
