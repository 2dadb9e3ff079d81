//! Boundary to the provider data store. The engine only ever reads batches;
//! the single write path is the conditional tier assignment used by
//! reconciliation.

use super::domain::{ProviderId, ProviderScoreInputs, Tier};

/// Predicates understood by the batch-read operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotFilter {
    pub state: Option<String>,
    pub con_state_only: bool,
    pub missing_tier_only: bool,
}

impl SnapshotFilter {
    /// Whether a record satisfies every predicate in this filter. Provided so
    /// in-memory sources and tests apply the same semantics.
    pub fn matches(&self, record: &ProviderScoreInputs) -> bool {
        if let Some(state) = &self.state {
            if !record.state.eq_ignore_ascii_case(state) {
                return false;
            }
        }
        if self.con_state_only && !record.con_state {
            return false;
        }
        if self.missing_tier_only && record.baseline_tier.is_some() {
            return false;
        }
        true
    }
}

/// Result of a conditional tier write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierWriteOutcome {
    Assigned,
    /// A tier already existed, typically because a concurrent manual edit won
    /// the race. Not an error.
    Skipped,
}

/// Read-only snapshot supplier plus the one guarded write.
pub trait ProviderSnapshotSource: Send + Sync {
    fn fetch(&self, filter: &SnapshotFilter) -> Result<Vec<ProviderScoreInputs>, SnapshotError>;

    /// Assign `tier` only if the record currently has none. Implementations
    /// must make the "current tier is null" check and the write atomic.
    fn assign_tier_if_missing(
        &self,
        id: &ProviderId,
        tier: Tier,
    ) -> Result<TierWriteOutcome, SnapshotError>;
}

/// Failures surfaced by the snapshot supplier. The engine performs no
/// retries; those belong to the I/O collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("provider snapshot source unavailable: {0}")]
    Unavailable(String),
    #[error("provider record not found")]
    NotFound,
}
