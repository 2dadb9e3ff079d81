//! Idempotent batch pass assigning a tier to records that have none. Existing
//! tiers are never overwritten: the write is conditional on the tier still
//! being missing, so a lost race against a manual edit is a skipped record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::classifier::classify;
use super::domain::TierCountSnapshot;
use super::profile::ScoringConfig;
use super::snapshot::{ProviderSnapshotSource, SnapshotError, SnapshotFilter, TierWriteOutcome};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub assigned: u32,
    pub skipped: u32,
    /// Distribution of the tiers assigned by this pass.
    pub distribution: TierCountSnapshot,
    pub completed_at: DateTime<Utc>,
}

pub fn reconcile<S>(
    source: &S,
    config: &ScoringConfig,
) -> Result<ReconciliationSummary, SnapshotError>
where
    S: ProviderSnapshotSource + ?Sized,
{
    let filter = SnapshotFilter {
        missing_tier_only: true,
        ..SnapshotFilter::default()
    };
    let pending = source.fetch(&filter)?;

    let mut assigned = 0;
    let mut skipped = 0;
    let mut distribution = TierCountSnapshot::default();

    for record in &pending {
        let tier = classify(record, config).tier;
        match source.assign_tier_if_missing(&record.provider_id, tier)? {
            TierWriteOutcome::Assigned => {
                assigned += 1;
                distribution.record(tier);
            }
            TierWriteOutcome::Skipped => skipped += 1,
        }
    }

    info!(assigned, skipped, profile = %config.name, "tier reconciliation pass complete");

    Ok(ReconciliationSummary {
        assigned,
        skipped,
        distribution,
        completed_at: Utc::now(),
    })
}
