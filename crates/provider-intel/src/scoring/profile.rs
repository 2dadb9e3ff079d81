//! Named, validated scoring profiles: weights, thresholds, and modifiers.
//!
//! A profile is validated once, then treated as read-only across any number of
//! evaluations. There is no ambient default; callers pass a profile into every
//! call, with [`ScoringConfig::default_profile`] as the one named default
//! instance.

use serde::{Deserialize, Serialize};

/// Tolerance when checking that a weight set sums to 100.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

const YELLOW_ADC_MULTIPLIER: f64 = 1.5;
const YELLOW_OVERALL_MULTIPLIER: f64 = 0.7;

/// Category weights for the gate-based tier classifier. Must sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierWeights {
    pub quality: f64,
    pub compliance: f64,
    pub operational: f64,
    pub market: f64,
}

impl TierWeights {
    pub fn total(&self) -> f64 {
        self.quality + self.compliance + self.operational + self.market
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_weight_sum("tier", self.total())
    }
}

/// Category weights for the partial-credit composite ranker. Must sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankWeights {
    pub adc: f64,
    pub quality: f64,
    pub market: f64,
    pub financial: f64,
    pub ownership: f64,
    pub demographics: f64,
}

impl RankWeights {
    pub fn total(&self) -> f64 {
        self.adc + self.quality + self.market + self.financial + self.ownership + self.demographics
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_weight_sum("rank", self.total())
    }
}

/// Admission thresholds for the GREEN tier. YELLOW thresholds are derived,
/// not independently configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub adc_max: f64,
    pub min_quality: f64,
    pub min_compliance: f64,
    pub min_operational: f64,
    pub min_market: f64,
    pub min_overall: f64,
}

impl Thresholds {
    /// The single place the 1.5x size / 0.7x score relationship is defined.
    pub fn yellow(&self) -> YellowThresholds {
        YellowThresholds {
            adc_max: self.adc_max * YELLOW_ADC_MULTIPLIER,
            min_overall: self.min_overall * YELLOW_OVERALL_MULTIPLIER,
        }
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_non_negative("thresholds.adc_max", self.adc_max)?;
        validate_non_negative("thresholds.min_quality", self.min_quality)?;
        validate_non_negative("thresholds.min_compliance", self.min_compliance)?;
        validate_non_negative("thresholds.min_operational", self.min_operational)?;
        validate_non_negative("thresholds.min_market", self.min_market)?;
        validate_non_negative("thresholds.min_overall", self.min_overall)
    }
}

/// Derived relaxed thresholds for the YELLOW gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YellowThresholds {
    pub adc_max: f64,
    pub min_overall: f64,
}

/// Score adjustments applied after the weighted average. Penalties are stored
/// as non-negative magnitudes; the sign is applied in the delta formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    pub con_state_bonus: f64,
    pub pe_backed_penalty: f64,
    pub chain_penalty: f64,
    pub ownership_complexity_penalty: f64,
}

impl Modifiers {
    fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_non_negative("modifiers.con_state_bonus", self.con_state_bonus)?;
        validate_non_negative("modifiers.pe_backed_penalty", self.pe_backed_penalty)?;
        validate_non_negative("modifiers.chain_penalty", self.chain_penalty)?;
        validate_non_negative(
            "modifiers.ownership_complexity_penalty",
            self.ownership_complexity_penalty,
        )
    }
}

/// Policy for gate comparisons against a missing metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDataPolicy {
    /// A missing value satisfies the gate, so incomplete records are not
    /// discarded. A record missing every category score will pass all GREEN
    /// gates except the overall-score check; that is the accepted trade-off.
    #[default]
    PassThrough,
    /// A missing value fails the gate.
    Strict,
}

impl MissingDataPolicy {
    /// Evaluate a gate predicate over an optional metric under this policy.
    pub fn gate(self, value: Option<f64>, pass: impl FnOnce(f64) -> bool) -> bool {
        match value {
            Some(value) => pass(value),
            None => matches!(self, MissingDataPolicy::PassThrough),
        }
    }
}

/// Named, immutable parameter bundle consumed by both scoring models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub name: String,
    pub tier_weights: TierWeights,
    pub rank_weights: RankWeights,
    pub thresholds: Thresholds,
    pub modifiers: Modifiers,
    #[serde(default)]
    pub missing_data: MissingDataPolicy,
}

impl ScoringConfig {
    /// The system default profile. One named instance, passed explicitly;
    /// nothing in the engine reads it ambiently.
    pub fn default_profile() -> Self {
        Self {
            name: "default".to_string(),
            tier_weights: TierWeights {
                quality: 30.0,
                compliance: 30.0,
                operational: 20.0,
                market: 20.0,
            },
            rank_weights: RankWeights {
                adc: 25.0,
                quality: 20.0,
                market: 20.0,
                financial: 15.0,
                ownership: 10.0,
                demographics: 10.0,
            },
            thresholds: Thresholds {
                adc_max: 60.0,
                min_quality: 70.0,
                min_compliance: 70.0,
                min_operational: 50.0,
                min_market: 50.0,
                min_overall: 65.0,
            },
            modifiers: Modifiers {
                con_state_bonus: 10.0,
                pe_backed_penalty: 15.0,
                chain_penalty: 5.0,
                ownership_complexity_penalty: 10.0,
            },
            missing_data: MissingDataPolicy::PassThrough,
        }
    }

    /// Full validation; must succeed before the profile is used for any
    /// computation. No partial application on failure.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.tier_weights.validate()?;
        self.rank_weights.validate()?;
        self.thresholds.validate()?;
        self.modifiers.validate()
    }
}

/// Raised when a profile fails validation, before any computation runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("{set} weights sum to {total:.2}, expected 100.00")]
    WeightSum { set: &'static str, total: f64 },
    #[error("{set} weights sum to zero")]
    ZeroWeightSum { set: &'static str },
    #[error("{field} must be non-negative, got {value}")]
    NegativeParameter { field: &'static str, value: f64 },
}

fn validate_weight_sum(set: &'static str, total: f64) -> Result<(), ConfigValidationError> {
    if total.abs() < WEIGHT_SUM_TOLERANCE {
        return Err(ConfigValidationError::ZeroWeightSum { set });
    }
    if (total - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigValidationError::WeightSum { set, total });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ConfigValidationError> {
    if value < 0.0 {
        return Err(ConfigValidationError::NegativeParameter { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        ScoringConfig::default_profile()
            .validate()
            .expect("default profile validates");
    }

    #[test]
    fn rejects_tier_weights_not_summing_to_100() {
        let mut config = ScoringConfig::default_profile();
        config.tier_weights.quality = 35.0;
        match config.validate() {
            Err(ConfigValidationError::WeightSum { set: "tier", total }) => {
                assert!((total - 105.0).abs() < 1e-9);
            }
            other => panic!("expected tier weight-sum rejection, got {other:?}"),
        }
    }

    #[test]
    fn tolerates_rounding_noise_in_weight_sum() {
        let mut config = ScoringConfig::default_profile();
        config.rank_weights.demographics = 10.005;
        config.rank_weights.ownership = 9.995;
        config.validate().expect("within tolerance");
    }

    #[test]
    fn rejects_zero_weight_sum_explicitly() {
        let mut config = ScoringConfig::default_profile();
        config.rank_weights = RankWeights {
            adc: 0.0,
            quality: 0.0,
            market: 0.0,
            financial: 0.0,
            ownership: 0.0,
            demographics: 0.0,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroWeightSum { set: "rank" })
        );
    }

    #[test]
    fn rejects_negative_modifier_magnitude() {
        let mut config = ScoringConfig::default_profile();
        config.modifiers.chain_penalty = -5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NegativeParameter {
                field: "modifiers.chain_penalty",
                ..
            })
        ));
    }

    #[test]
    fn yellow_thresholds_derive_from_green() {
        let thresholds = ScoringConfig::default_profile().thresholds;
        let yellow = thresholds.yellow();
        assert!((yellow.adc_max - 90.0).abs() < 1e-9);
        assert!((yellow.min_overall - 45.5).abs() < 1e-9);
    }

    #[test]
    fn missing_data_policy_gates() {
        assert!(MissingDataPolicy::PassThrough.gate(None, |_| false));
        assert!(!MissingDataPolicy::Strict.gate(None, |_| true));
        assert!(MissingDataPolicy::Strict.gate(Some(70.0), |v| v >= 70.0));
    }

    #[test]
    fn profile_round_trips_through_json() {
        let profile = ScoringConfig::default_profile();
        let json = serde_json::to_string(&profile).expect("serializes");
        let parsed: ScoringConfig = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(parsed, profile);
    }
}
