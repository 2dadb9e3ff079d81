use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::scoring::domain::{
    OwnershipComplexity, ProviderId, ProviderScoreInputs, Tier,
};
use crate::scoring::profile::ScoringConfig;
use crate::scoring::service::ScoringService;
use crate::scoring::snapshot::{
    ProviderSnapshotSource, SnapshotError, SnapshotFilter, TierWriteOutcome,
};

/// A well-rounded hospice operator that clears every GREEN gate under the
/// default profile.
pub(super) fn strong_provider(id: &str) -> ProviderScoreInputs {
    ProviderScoreInputs {
        provider_id: ProviderId(id.to_string()),
        state: "GA".to_string(),
        adc: Some(45.0),
        quality_score: Some(80.0),
        compliance_score: Some(75.0),
        operational_score: Some(60.0),
        market_score: Some(65.0),
        con_state: true,
        pe_backed: false,
        chain_affiliated: false,
        ownership_complexity: OwnershipComplexity::Simple,
        net_income: Some(120_000.0),
        total_revenue: Some(2_400_000.0),
        pct_65_plus: Some(22.0),
        baseline_overall_score: None,
        baseline_tier: None,
    }
}

/// A record with every optional field missing.
pub(super) fn sparse_provider(id: &str) -> ProviderScoreInputs {
    ProviderScoreInputs {
        provider_id: ProviderId(id.to_string()),
        state: "TX".to_string(),
        adc: None,
        quality_score: None,
        compliance_score: None,
        operational_score: None,
        market_score: None,
        con_state: false,
        pe_backed: false,
        chain_affiliated: false,
        ownership_complexity: OwnershipComplexity::Simple,
        net_income: None,
        total_revenue: None,
        pct_65_plus: None,
        baseline_overall_score: None,
        baseline_tier: None,
    }
}

pub(super) fn default_config() -> ScoringConfig {
    ScoringConfig::default_profile()
}

pub(super) fn build_service(
    records: Vec<ProviderScoreInputs>,
) -> (ScoringService<MemorySource>, Arc<MemorySource>) {
    let source = Arc::new(MemorySource::with_records(records));
    let service = ScoringService::new(source.clone()).expect("default profile validates");
    (service, source)
}

/// In-memory snapshot source whose conditional write is atomic under a mutex.
#[derive(Default, Clone)]
pub(super) struct MemorySource {
    records: Arc<Mutex<BTreeMap<ProviderId, ProviderScoreInputs>>>,
}

impl MemorySource {
    pub(super) fn with_records(records: Vec<ProviderScoreInputs>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.provider_id.clone(), record))
            .collect();
        Self {
            records: Arc::new(Mutex::new(map)),
        }
    }

    pub(super) fn snapshot(&self) -> Vec<ProviderScoreInputs> {
        self.records
            .lock()
            .expect("source mutex poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Simulate a concurrent manual edit by writing a tier directly.
    pub(super) fn set_tier(&self, id: &ProviderId, tier: Tier) {
        let mut guard = self.records.lock().expect("source mutex poisoned");
        if let Some(record) = guard.get_mut(id) {
            record.baseline_tier = Some(tier);
        }
    }
}

impl ProviderSnapshotSource for MemorySource {
    fn fetch(&self, filter: &SnapshotFilter) -> Result<Vec<ProviderScoreInputs>, SnapshotError> {
        let guard = self.records.lock().expect("source mutex poisoned");
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
        let mut guard = self.records.lock().expect("source mutex poisoned");
        let record = guard.get_mut(id).ok_or(SnapshotError::NotFound)?;
        if record.baseline_tier.is_some() {
            return Ok(TierWriteOutcome::Skipped);
        }
        record.baseline_tier = Some(tier);
        Ok(TierWriteOutcome::Assigned)
    }
}

/// Source that fails every operation, standing in for a store outage.
pub(super) struct UnavailableSource;

impl ProviderSnapshotSource for UnavailableSource {
    fn fetch(&self, _filter: &SnapshotFilter) -> Result<Vec<ProviderScoreInputs>, SnapshotError> {
        Err(SnapshotError::Unavailable("registry store offline".to_string()))
    }

    fn assign_tier_if_missing(
        &self,
        _id: &ProviderId,
        _tier: Tier,
    ) -> Result<TierWriteOutcome, SnapshotError> {
        Err(SnapshotError::Unavailable("registry store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
