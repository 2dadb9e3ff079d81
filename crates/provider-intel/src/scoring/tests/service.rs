use std::sync::Arc;

use super::common::*;
use crate::scoring::profile::{ConfigValidationError, RankWeights};
use crate::scoring::service::{RankQuery, ScoringService, ScoringServiceError};
use crate::scoring::snapshot::SnapshotError;

#[test]
fn rank_applies_filters_and_limit() {
    let mut texan = strong_provider("prov-tx");
    texan.state = "TX".to_string();
    texan.con_state = false;
    let (service, _source) = build_service(vec![
        strong_provider("prov-a"),
        strong_provider("prov-b"),
        texan,
    ]);

    let results = service
        .rank(RankQuery {
            state: Some("ga".to_string()),
            limit: Some(1),
            ..RankQuery::default()
        })
        .expect("rank succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].provider_id.0, "prov-a");
}

#[test]
fn rank_filters_by_minimum_composite_score() {
    let (service, _source) = build_service(vec![
        strong_provider("prov-a"),
        sparse_provider("prov-sparse"),
    ]);

    let results = service
        .rank(RankQuery {
            min_score: Some(50.0),
            ..RankQuery::default()
        })
        .expect("rank succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].provider_id.0, "prov-a");
}

#[test]
fn rank_restricts_to_con_states_when_asked() {
    let mut open_market = strong_provider("prov-open");
    open_market.con_state = false;
    let (service, _source) = build_service(vec![strong_provider("prov-con"), open_market]);

    let results = service
        .rank(RankQuery {
            con_state_only: true,
            ..RankQuery::default()
        })
        .expect("rank succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].provider_id.0, "prov-con");
}

#[test]
fn invalid_weights_are_rejected_before_any_fetch() {
    // An unavailable source proves validation happens first: a fetch would
    // fail with a data error, but we get the config rejection instead.
    let service = ScoringService::new(Arc::new(UnavailableSource)).expect("profile validates");

    let result = service.rank(RankQuery {
        weights: Some(RankWeights {
            adc: 50.0,
            quality: 20.0,
            market: 20.0,
            financial: 15.0,
            ownership: 10.0,
            demographics: 10.0,
        }),
        ..RankQuery::default()
    });

    match result {
        Err(ScoringServiceError::Config(ConfigValidationError::WeightSum { set, .. })) => {
            assert_eq!(set, "rank");
        }
        other => panic!("expected weight-sum rejection, got {other:?}"),
    }
}

#[test]
fn preview_rejects_invalid_hypothetical_config() {
    let (service, _source) = build_service(vec![strong_provider("prov-a")]);
    let mut config = default_config();
    config.tier_weights.market = 0.0;

    assert!(matches!(
        service.preview(config),
        Err(ScoringServiceError::Config(_))
    ));
}

#[test]
fn store_outage_surfaces_as_data_error() {
    let service = ScoringService::new(Arc::new(UnavailableSource)).expect("profile validates");

    let result = service.rank(RankQuery::default());

    assert!(matches!(
        result,
        Err(ScoringServiceError::Data(SnapshotError::Unavailable(_)))
    ));
}

#[test]
fn service_profile_must_validate_at_construction() {
    let mut profile = default_config();
    profile.tier_weights.quality = 99.0;

    let result = ScoringService::with_profile(Arc::new(UnavailableSource), profile);

    assert!(result.is_err());
}

#[test]
fn reconcile_uses_the_default_profile() {
    let (service, source) = build_service(vec![strong_provider("prov-a")]);

    let summary = service.reconcile().expect("reconcile runs");

    assert_eq!(summary.assigned, 1);
    assert_eq!(summary.distribution.green, 1);
    let records = source.snapshot();
    assert!(records[0].baseline_tier.is_some());
}
