use std::sync::Arc;

use super::domain::{ProviderScoreInputs, TierCountSnapshot};
use super::preview::{preview, PreviewOutcome};
use super::profile::{ConfigValidationError, RankWeights, ScoringConfig};
use super::ranker::{rank, RankingResult};
use super::reconcile::{reconcile, ReconciliationSummary};
use super::snapshot::{ProviderSnapshotSource, SnapshotError, SnapshotFilter};

/// Facade composing the snapshot supplier with the scoring engines. Holds the
/// one named default profile; every computation receives its parameters
/// explicitly.
pub struct ScoringService<S> {
    source: Arc<S>,
    default_profile: ScoringConfig,
}

/// Parameters for a ranking request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankQuery {
    /// Weight map; the default profile's rank weights when absent.
    pub weights: Option<RankWeights>,
    pub state: Option<String>,
    pub con_state_only: bool,
    pub min_score: Option<f64>,
    pub limit: Option<usize>,
}

impl<S> ScoringService<S>
where
    S: ProviderSnapshotSource + 'static,
{
    pub fn new(source: Arc<S>) -> Result<Self, ConfigValidationError> {
        Self::with_profile(source, ScoringConfig::default_profile())
    }

    /// Build a service over a caller-supplied default profile. The profile is
    /// validated here, once, and reused read-only afterwards.
    pub fn with_profile(
        source: Arc<S>,
        default_profile: ScoringConfig,
    ) -> Result<Self, ConfigValidationError> {
        default_profile.validate()?;
        Ok(Self {
            source,
            default_profile,
        })
    }

    pub fn default_profile(&self) -> &ScoringConfig {
        &self.default_profile
    }

    /// Rank the stored population. Weights are validated before the store is
    /// touched; an invalid map is rejected with no partial work.
    pub fn rank(&self, query: RankQuery) -> Result<Vec<RankingResult>, ScoringServiceError> {
        let weights = self.resolve_weights(query.weights.clone())?;
        let filter = SnapshotFilter {
            state: query.state.clone(),
            con_state_only: query.con_state_only,
            missing_tier_only: false,
        };
        let records = self.source.fetch(&filter)?;
        self.rank_validated(&records, weights, query)
    }

    /// Rank an already-loaded batch, e.g. an ad-hoc CSV upload. The filter
    /// predicates apply here too so both paths behave identically.
    pub fn rank_records(
        &self,
        records: &[ProviderScoreInputs],
        query: RankQuery,
    ) -> Result<Vec<RankingResult>, ScoringServiceError> {
        let weights = self.resolve_weights(query.weights.clone())?;
        self.rank_validated(records, weights, query)
    }

    fn resolve_weights(
        &self,
        weights: Option<RankWeights>,
    ) -> Result<RankWeights, ConfigValidationError> {
        match weights {
            Some(weights) => {
                weights.validate()?;
                Ok(weights)
            }
            None => Ok(self.default_profile.rank_weights.clone()),
        }
    }

    fn rank_validated(
        &self,
        records: &[ProviderScoreInputs],
        weights: RankWeights,
        query: RankQuery,
    ) -> Result<Vec<RankingResult>, ScoringServiceError> {
        let filter = SnapshotFilter {
            state: query.state,
            con_state_only: query.con_state_only,
            missing_tier_only: false,
        };
        let eligible: Vec<ProviderScoreInputs> = records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();

        let mut results = rank(&eligible, &weights);
        if let Some(min_score) = query.min_score {
            results.retain(|result| result.composite_score >= min_score);
        }
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    /// Reclassify the whole population under a hypothetical profile and diff
    /// the tier counts against the stored baseline. Never writes.
    pub fn preview(&self, config: ScoringConfig) -> Result<PreviewOutcome, ScoringServiceError> {
        config.validate()?;
        let population = self.source.fetch(&SnapshotFilter::default())?;
        let baseline = TierCountSnapshot::baseline_of(&population);
        Ok(preview(&population, &config, baseline))
    }

    /// Assign the default-profile tier to every record still missing one.
    pub fn reconcile(&self) -> Result<ReconciliationSummary, ScoringServiceError> {
        Ok(reconcile(self.source.as_ref(), &self.default_profile)?)
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Config(#[from] ConfigValidationError),
    #[error(transparent)]
    Data(#[from] SnapshotError),
}
