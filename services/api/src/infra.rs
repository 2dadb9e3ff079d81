use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use provider_intel::scoring::{
    OwnershipComplexity, ProviderId, ProviderScoreInputs, ProviderSnapshotSource, SnapshotError,
    SnapshotFilter, Tier, TierWriteOutcome,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-backed store so the conditional tier write is atomic with its
/// "still missing" check.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProviderSource {
    records: Arc<Mutex<BTreeMap<ProviderId, ProviderScoreInputs>>>,
}

impl InMemoryProviderSource {
    pub(crate) fn with_records(records: Vec<ProviderScoreInputs>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.provider_id.clone(), record))
            .collect();
        Self {
            records: Arc::new(Mutex::new(map)),
        }
    }
}

impl ProviderSnapshotSource for InMemoryProviderSource {
    fn fetch(&self, filter: &SnapshotFilter) -> Result<Vec<ProviderScoreInputs>, SnapshotError> {
        let guard = self.records.lock().expect("provider store mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn assign_tier_if_missing(
        &self,
        id: &ProviderId,
        tier: Tier,
    ) -> Result<TierWriteOutcome, SnapshotError> {
        let mut guard = self.records.lock().expect("provider store mutex poisoned");
        let record = guard.get_mut(id).ok_or(SnapshotError::NotFound)?;
        if record.baseline_tier.is_some() {
            return Ok(TierWriteOutcome::Skipped);
        }
        record.baseline_tier = Some(tier);
        Ok(TierWriteOutcome::Assigned)
    }
}

/// Synthetic population used by `serve` (until a registry feed is wired in)
/// and by the CLI demo.
pub(crate) fn seed_providers() -> Vec<ProviderScoreInputs> {
    fn provider(
        id: &str,
        state: &str,
        adc: Option<f64>,
        scores: [Option<f64>; 4],
        con_state: bool,
    ) -> ProviderScoreInputs {
        ProviderScoreInputs {
            provider_id: ProviderId(id.to_string()),
            state: state.to_string(),
            adc,
            quality_score: scores[0],
            compliance_score: scores[1],
            operational_score: scores[2],
            market_score: scores[3],
            con_state,
            pe_backed: false,
            chain_affiliated: false,
            ownership_complexity: OwnershipComplexity::Simple,
            net_income: Some(100_000.0),
            total_revenue: Some(2_000_000.0),
            pct_65_plus: Some(18.0),
            baseline_overall_score: None,
            baseline_tier: None,
        }
    }

    let mut records = vec![
        provider(
            "hosp-ga-001",
            "GA",
            Some(45.0),
            [Some(80.0), Some(75.0), Some(60.0), Some(65.0)],
            true,
        ),
        provider(
            "hosp-ga-002",
            "GA",
            Some(150.0),
            [Some(82.0), Some(74.0), Some(61.0), Some(70.0)],
            true,
        ),
        provider(
            "hosp-tx-001",
            "TX",
            Some(12.0),
            [Some(68.0), Some(71.0), Some(55.0), Some(52.0)],
            false,
        ),
        provider(
            "hosp-tx-002",
            "TX",
            None,
            [None, None, None, None],
            false,
        ),
        provider(
            "hosp-nc-001",
            "NC",
            Some(58.0),
            [Some(91.0), Some(88.0), Some(72.0), Some(77.0)],
            true,
        ),
        provider(
            "hosp-fl-001",
            "FL",
            Some(95.0),
            [Some(77.0), Some(65.0), Some(58.0), Some(60.0)],
            true,
        ),
    ];

    records[1].pe_backed = true;
    records[1].ownership_complexity = OwnershipComplexity::Complex;
    records[2].chain_affiliated = true;
    records[3].baseline_overall_score = Some(62.0);
    records[4].baseline_tier = Some(Tier::Green);
    records[4].pct_65_plus = Some(24.0);
    records[5].net_income = Some(-35_000.0);

    records
}
