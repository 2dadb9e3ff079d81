use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::TierCountSnapshot;
use super::ingest::SnapshotImporter;
use super::preview::PreviewOutcome;
use super::profile::{
    MissingDataPolicy, Modifiers, RankWeights, ScoringConfig, Thresholds, TierWeights,
};
use super::ranker::RankingResult;
use super::service::{RankQuery, ScoringService, ScoringServiceError};
use super::snapshot::{ProviderSnapshotSource, SnapshotError};

/// Router builder exposing the scoring endpoints.
pub fn scoring_router<S>(service: Arc<ScoringService<S>>) -> Router
where
    S: ProviderSnapshotSource + 'static,
{
    Router::new()
        .route("/api/v1/scoring/profile", get(profile_handler::<S>))
        .route("/api/v1/scoring/rank", post(rank_handler::<S>))
        .route("/api/v1/scoring/preview", post(preview_handler::<S>))
        .route("/api/v1/scoring/reconcile", post(reconcile_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RankRequest {
    #[serde(default)]
    pub(crate) weights: Option<RankWeights>,
    #[serde(default)]
    pub(crate) state: Option<String>,
    #[serde(default)]
    pub(crate) con_state_only: bool,
    #[serde(default)]
    pub(crate) min_score: Option<f64>,
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Inline registry export; when present the upload is ranked instead of
    /// the stored population.
    #[serde(default)]
    pub(crate) providers_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankResponse {
    pub(crate) count: usize,
    pub(crate) results: Vec<RankingResult>,
}

/// Hypothetical parameter set matching the tier classifier's shape.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) tier_weights: TierWeights,
    pub(crate) thresholds: Thresholds,
    pub(crate) modifiers: Modifiers,
    #[serde(default)]
    pub(crate) missing_data: MissingDataPolicy,
}

#[derive(Debug, Serialize)]
pub(crate) struct PreviewResponse {
    pub(crate) green_count: u32,
    pub(crate) yellow_count: u32,
    pub(crate) red_count: u32,
    pub(crate) green_delta: i64,
    pub(crate) yellow_delta: i64,
    pub(crate) red_delta: i64,
    pub(crate) baseline: TierCountSnapshot,
}

impl From<PreviewOutcome> for PreviewResponse {
    fn from(outcome: PreviewOutcome) -> Self {
        Self {
            green_count: outcome.counts.green,
            yellow_count: outcome.counts.yellow,
            red_count: outcome.counts.red,
            green_delta: outcome.delta.green,
            yellow_delta: outcome.delta.yellow,
            red_delta: outcome.delta.red,
            baseline: outcome.baseline,
        }
    }
}

pub(crate) async fn profile_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
) -> Response
where
    S: ProviderSnapshotSource + 'static,
{
    (StatusCode::OK, axum::Json(service.default_profile().clone())).into_response()
}

pub(crate) async fn rank_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
    axum::Json(request): axum::Json<RankRequest>,
) -> Response
where
    S: ProviderSnapshotSource + 'static,
{
    let query = RankQuery {
        weights: request.weights,
        state: request.state,
        con_state_only: request.con_state_only,
        min_score: request.min_score,
        limit: request.limit,
    };

    let ranked = match request.providers_csv {
        Some(csv) => match SnapshotImporter::from_reader(Cursor::new(csv.into_bytes())) {
            Ok(records) => service.rank_records(&records, query),
            Err(error) => {
                let payload = json!({ "error": error.to_string() });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => service.rank(query),
    };

    match ranked {
        Ok(results) => {
            let body = RankResponse {
                count: results.len(),
                results,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response
where
    S: ProviderSnapshotSource + 'static,
{
    // Preview only exercises the classifier; the ranker weights come from the
    // default profile so the hypothetical config still validates as a whole.
    let config = ScoringConfig {
        name: "hypothetical".to_string(),
        tier_weights: request.tier_weights,
        rank_weights: service.default_profile().rank_weights.clone(),
        thresholds: request.thresholds,
        modifiers: request.modifiers,
        missing_data: request.missing_data,
    };

    match service.preview(config) {
        Ok(outcome) => {
            let body = PreviewResponse::from(outcome);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reconcile_handler<S>(
    State(service): State<Arc<ScoringService<S>>>,
) -> Response
where
    S: ProviderSnapshotSource + 'static,
{
    match service.reconcile() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScoringServiceError) -> Response {
    let status = match &error {
        ScoringServiceError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringServiceError::Data(SnapshotError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        ScoringServiceError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
