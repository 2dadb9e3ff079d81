//! Gate-based tier classifier: admission question ("is this provider ready?"),
//! distinct from the composite ranker's ordering question.

use serde::{Deserialize, Serialize};

use super::domain::{OwnershipComplexity, ProviderScoreInputs, Tier};
use super::profile::{Modifiers, ScoringConfig, TierWeights};

/// Output of one classification. Ephemeral: computed fresh per call, never
/// cached or persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub tier: Tier,
    pub weighted_score: Option<f64>,
    pub modifier_delta: f64,
    pub adjusted_score: Option<f64>,
}

/// Classify one provider under a validated profile.
///
/// Pure and total: defined for every input, missing metrics are resolved by
/// the profile's [`MissingDataPolicy`](super::profile::MissingDataPolicy) and
/// the baseline pass-through, never by an error.
pub fn classify(record: &ProviderScoreInputs, config: &ScoringConfig) -> ClassificationResult {
    let weighted_score = weighted_score(record, &config.tier_weights);
    let modifier_delta = modifier_delta(record, &config.modifiers);
    let adjusted_score = weighted_score.map(|score| score + modifier_delta);
    let tier = assign_tier(record, config, adjusted_score);

    ClassificationResult {
        tier,
        weighted_score,
        modifier_delta,
        adjusted_score,
    }
}

/// Weighted average of the four category scores when all are present.
/// Incomplete records fall back to the persisted baseline overall score.
fn weighted_score(record: &ProviderScoreInputs, weights: &TierWeights) -> Option<f64> {
    match (
        record.quality_score,
        record.compliance_score,
        record.operational_score,
        record.market_score,
    ) {
        (Some(quality), Some(compliance), Some(operational), Some(market)) => Some(
            (quality * weights.quality
                + compliance * weights.compliance
                + operational * weights.operational
                + market * weights.market)
                / weights.total(),
        ),
        _ => record.baseline_overall_score,
    }
}

fn modifier_delta(record: &ProviderScoreInputs, modifiers: &Modifiers) -> f64 {
    let mut delta = 0.0;
    if record.con_state {
        delta += modifiers.con_state_bonus;
    }
    if record.pe_backed {
        delta -= modifiers.pe_backed_penalty;
    }
    if record.chain_affiliated {
        delta -= modifiers.chain_penalty;
    }
    if record.ownership_complexity == OwnershipComplexity::Complex {
        delta -= modifiers.ownership_complexity_penalty;
    }
    delta
}

/// Ordered gates, first match wins. All comparisons are inclusive: a record
/// exactly at a threshold qualifies.
fn assign_tier(
    record: &ProviderScoreInputs,
    config: &ScoringConfig,
    adjusted_score: Option<f64>,
) -> Tier {
    let policy = config.missing_data;
    let thresholds = &config.thresholds;

    let green = policy.gate(record.adc, |adc| adc <= thresholds.adc_max)
        && policy.gate(record.quality_score, |score| score >= thresholds.min_quality)
        && policy.gate(record.compliance_score, |score| {
            score >= thresholds.min_compliance
        })
        && policy.gate(record.operational_score, |score| {
            score >= thresholds.min_operational
        })
        && policy.gate(record.market_score, |score| score >= thresholds.min_market)
        && policy.gate(adjusted_score, |score| score >= thresholds.min_overall);
    if green {
        return Tier::Green;
    }

    let yellow_thresholds = thresholds.yellow();
    let yellow = policy.gate(record.adc, |adc| adc <= yellow_thresholds.adc_max)
        && policy.gate(adjusted_score, |score| {
            score >= yellow_thresholds.min_overall
        });
    if yellow {
        Tier::Yellow
    } else {
        Tier::Red
    }
}
