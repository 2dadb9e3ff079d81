use serde::{Deserialize, Serialize};

/// Identifier wrapper for provider records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub String);

/// Discrete acquisition-readiness bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Green,
    Yellow,
    Red,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Green => "green",
            Tier::Yellow => "yellow",
            Tier::Red => "red",
        }
    }
}

/// How layered the operator's corporate structure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnershipComplexity {
    Simple,
    Moderate,
    Complex,
}

/// Read-only view of one provider used for a single evaluation.
///
/// Optional metrics stay optional all the way through scoring; missing data is
/// resolved by documented fallback rules, never by rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderScoreInputs {
    pub provider_id: ProviderId,
    pub state: String,
    /// Average daily census, the size proxy.
    pub adc: Option<f64>,
    pub quality_score: Option<f64>,
    pub compliance_score: Option<f64>,
    pub operational_score: Option<f64>,
    pub market_score: Option<f64>,
    pub con_state: bool,
    pub pe_backed: bool,
    pub chain_affiliated: bool,
    pub ownership_complexity: OwnershipComplexity,
    pub net_income: Option<f64>,
    pub total_revenue: Option<f64>,
    pub pct_65_plus: Option<f64>,
    pub baseline_overall_score: Option<f64>,
    pub baseline_tier: Option<Tier>,
}

/// Tier distribution over a population, used both as a stored baseline and as
/// the output of a hypothetical recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCountSnapshot {
    pub green: u32,
    pub yellow: u32,
    pub red: u32,
}

impl TierCountSnapshot {
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Green => self.green += 1,
            Tier::Yellow => self.yellow += 1,
            Tier::Red => self.red += 1,
        }
    }

    /// Distribution of the tiers currently persisted on a population.
    /// Records without a stored tier are not counted.
    pub fn baseline_of(records: &[ProviderScoreInputs]) -> Self {
        let mut counts = Self::default();
        for record in records {
            if let Some(tier) = record.baseline_tier {
                counts.record(tier);
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.green + self.yellow + self.red
    }

    /// Signed per-tier difference of `self` against `baseline`.
    pub fn diff(&self, baseline: &TierCountSnapshot) -> TierCountDelta {
        TierCountDelta {
            green: i64::from(self.green) - i64::from(baseline.green),
            yellow: i64::from(self.yellow) - i64::from(baseline.yellow),
            red: i64::from(self.red) - i64::from(baseline.red),
        }
    }
}

/// Signed movement between two tier distributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCountDelta {
    pub green: i64,
    pub yellow: i64,
    pub red: i64,
}
