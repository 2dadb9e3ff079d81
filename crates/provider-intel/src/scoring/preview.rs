//! What-if evaluation: reclassify a population under a hypothetical profile
//! and diff the resulting tier counts against the stored baseline. Reads only;
//! independent across calls, so concurrent previews need no coordination.

use serde::{Deserialize, Serialize};

use super::classifier::classify;
use super::domain::{ProviderScoreInputs, TierCountDelta, TierCountSnapshot};
use super::profile::ScoringConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOutcome {
    pub counts: TierCountSnapshot,
    pub baseline: TierCountSnapshot,
    pub delta: TierCountDelta,
}

pub fn preview(
    population: &[ProviderScoreInputs],
    config: &ScoringConfig,
    baseline: TierCountSnapshot,
) -> PreviewOutcome {
    let mut counts = TierCountSnapshot::default();
    for record in population {
        counts.record(classify(record, config).tier);
    }

    PreviewOutcome {
        counts,
        delta: counts.diff(&baseline),
        baseline,
    }
}
