//! Partial-credit composite ranker. Each category earns a credit ratio in
//! [0, 1] against its weight; the breakdown returned alongside the score
//! reproduces the exact terms used in the sum so the number is auditable.

use serde::{Deserialize, Serialize};

use super::domain::{ProviderId, ProviderScoreInputs};
use super::profile::RankWeights;

/// Per-category contributions, each expressed in the units of its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub adc: f64,
    pub quality: f64,
    pub market: f64,
    pub financial: f64,
    pub ownership: f64,
    pub demographics: f64,
}

impl CategoryBreakdown {
    pub fn total(&self) -> f64 {
        self.adc + self.quality + self.market + self.financial + self.ownership + self.demographics
    }
}

/// Continuous 0-100 ranking value with its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub provider_id: ProviderId,
    pub composite_score: f64,
    pub breakdown: CategoryBreakdown,
}

/// Score and order a population under a validated weight set.
///
/// Sorted descending by composite score; ties break by ascending provider id
/// so repeated calls over identical input produce identical output.
pub fn rank(records: &[ProviderScoreInputs], weights: &RankWeights) -> Vec<RankingResult> {
    let mut results: Vec<RankingResult> = records
        .iter()
        .map(|record| score_record(record, weights))
        .collect();

    results.sort_by(|a, b| {
        b.composite_score
            .total_cmp(&a.composite_score)
            .then_with(|| a.provider_id.cmp(&b.provider_id))
    });

    results
}

fn score_record(record: &ProviderScoreInputs, weights: &RankWeights) -> RankingResult {
    let breakdown = CategoryBreakdown {
        adc: adc_credit(record.adc) * weights.adc,
        quality: quality_credit(record) * weights.quality,
        market: market_credit(record) * weights.market,
        financial: financial_credit(record) * weights.financial,
        ownership: ownership_credit(record) * weights.ownership,
        demographics: demographics_credit(record) * weights.demographics,
    };

    let composite = 100.0 * breakdown.total() / weights.total();

    RankingResult {
        provider_id: record.provider_id.clone(),
        composite_score: round_one_decimal(composite),
        breakdown,
    }
}

/// Full credit inside the ideal [20, 60] band, partial credit on either side,
/// none for null, zero, or census above 100.
fn adc_credit(adc: Option<f64>) -> f64 {
    match adc {
        Some(adc) if (20.0..=60.0).contains(&adc) => 1.0,
        Some(adc) if adc > 0.0 && adc < 20.0 => 0.5,
        Some(adc) if adc > 60.0 && adc <= 100.0 => 0.6,
        _ => 0.0,
    }
}

/// Quality falls back to compliance, then to a neutral 50. A missing metric
/// never disqualifies a record.
fn quality_credit(record: &ProviderScoreInputs) -> f64 {
    record
        .quality_score
        .or(record.compliance_score)
        .unwrap_or(50.0)
        / 100.0
}

fn market_credit(record: &ProviderScoreInputs) -> f64 {
    if record.con_state {
        1.0
    } else {
        0.5
    }
}

fn financial_credit(record: &ProviderScoreInputs) -> f64 {
    if record.net_income.is_some_and(|income| income > 0.0) {
        1.0
    } else if record.total_revenue.is_some() {
        0.5
    } else {
        0.0
    }
}

fn ownership_credit(record: &ProviderScoreInputs) -> f64 {
    if !record.pe_backed && !record.chain_affiliated {
        1.0
    } else if !record.pe_backed {
        0.5
    } else {
        0.0
    }
}

/// Missing demographic data lands on the worst non-zero rung rather than
/// zeroing the category out.
fn demographics_credit(record: &ProviderScoreInputs) -> f64 {
    match record.pct_65_plus {
        Some(pct) if pct >= 20.0 => 1.0,
        Some(pct) if pct >= 15.0 => 0.7,
        _ => 0.3,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
