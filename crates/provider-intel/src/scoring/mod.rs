//! The scoring and classification engine.
//!
//! Two deliberately separate models answer two different questions: the
//! gate-based [`classifier`] decides admission (GREEN/YELLOW/RED), while the
//! partial-credit [`ranker`] orders a population on a continuous 0-100 scale.
//! Both are pure functions over a read-only snapshot and an explicit,
//! validated profile; [`preview`] and [`reconcile`] are batch compositions of
//! the classifier.

pub mod classifier;
pub mod domain;
pub mod ingest;
pub mod preview;
pub mod profile;
pub mod ranker;
pub mod reconcile;
pub mod router;
pub mod service;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use classifier::{classify, ClassificationResult};
pub use domain::{
    OwnershipComplexity, ProviderId, ProviderScoreInputs, Tier, TierCountDelta, TierCountSnapshot,
};
pub use ingest::{SnapshotImportError, SnapshotImporter};
pub use preview::{preview, PreviewOutcome};
pub use profile::{
    ConfigValidationError, MissingDataPolicy, Modifiers, RankWeights, ScoringConfig, Thresholds,
    TierWeights, YellowThresholds, WEIGHT_SUM_TOLERANCE,
};
pub use ranker::{rank, CategoryBreakdown, RankingResult};
pub use reconcile::{reconcile, ReconciliationSummary};
pub use router::scoring_router;
pub use service::{RankQuery, ScoringService, ScoringServiceError};
pub use snapshot::{ProviderSnapshotSource, SnapshotError, SnapshotFilter, TierWriteOutcome};
