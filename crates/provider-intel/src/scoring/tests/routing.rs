use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::scoring::router::scoring_router;

fn router_with(records: Vec<crate::scoring::domain::ProviderScoreInputs>) -> axum::Router {
    let (service, _source) = build_service(records);
    scoring_router(Arc::new(service))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn rank_endpoint_returns_ordered_results() {
    let router = router_with(vec![strong_provider("prov-a"), sparse_provider("prov-z")]);

    let response = router
        .oneshot(post_json("/api/v1/scoring/rank", json!({})))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["provider_id"], "prov-a");
    let first = body["results"][0]["composite_score"].as_f64().expect("score");
    let second = body["results"][1]["composite_score"].as_f64().expect("score");
    assert!(first >= second);
}

#[tokio::test]
async fn rank_endpoint_accepts_inline_csv() {
    let router = router_with(Vec::new());
    let csv = "Provider ID,State,ADC,Quality Score,Compliance Score,Operational Score,Market Score,CON State,PE Backed,Chain Affiliated,Ownership Complexity,Net Income,Total Revenue,Pct 65 Plus,Baseline Overall Score,Baseline Tier\nupload-1,GA,35,88,,,,yes,no,no,simple,120000,,22,,\n";

    let response = router
        .oneshot(post_json(
            "/api/v1/scoring/rank",
            json!({ "providers_csv": csv }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["provider_id"], "upload-1");
    assert_eq!(body["results"][0]["composite_score"], 97.6);
}

#[tokio::test]
async fn rank_endpoint_rejects_malformed_csv() {
    let router = router_with(Vec::new());

    let response = router
        .oneshot(post_json(
            "/api/v1/scoring/rank",
            json!({ "providers_csv": "Provider ID,ADC\nprov-1,many\n" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rank_endpoint_rejects_bad_weight_sum() {
    let router = router_with(vec![strong_provider("prov-a")]);

    let response = router
        .oneshot(post_json(
            "/api/v1/scoring/rank",
            json!({
                "weights": {
                    "adc": 80.0,
                    "quality": 20.0,
                    "market": 20.0,
                    "financial": 15.0,
                    "ownership": 10.0,
                    "demographics": 10.0
                }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().expect("message").contains("weights"));
}

#[tokio::test]
async fn preview_endpoint_reports_counts_and_deltas() {
    let mut tiered = strong_provider("prov-a");
    tiered.baseline_tier = Some(crate::scoring::domain::Tier::Red);
    let router = router_with(vec![tiered]);

    let config = default_config();
    let response = router
        .oneshot(post_json(
            "/api/v1/scoring/preview",
            json!({
                "tier_weights": config.tier_weights,
                "thresholds": config.thresholds,
                "modifiers": config.modifiers
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["green_count"], 1);
    assert_eq!(body["red_count"], 0);
    assert_eq!(body["green_delta"], 1);
    assert_eq!(body["red_delta"], -1);
    assert_eq!(body["baseline"]["red"], 1);
}

#[tokio::test]
async fn reconcile_endpoint_is_idempotent() {
    let (service, _source) = build_service(vec![strong_provider("prov-a")]);
    let router = scoring_router(Arc::new(service));

    let first = router
        .clone()
        .oneshot(post_json("/api/v1/scoring/reconcile", json!({})))
        .await
        .expect("router responds");
    assert_eq!(first.status(), StatusCode::OK);
    let body = read_json_body(first).await;
    assert_eq!(body["assigned"], 1);

    let second = router
        .oneshot(post_json("/api/v1/scoring/reconcile", json!({})))
        .await
        .expect("router responds");
    let body = read_json_body(second).await;
    assert_eq!(body["assigned"], 0);
}

#[tokio::test]
async fn profile_endpoint_exposes_the_default_profile() {
    let router = router_with(Vec::new());

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/scoring/profile")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["name"], "default");
    assert_eq!(body["tier_weights"]["quality"], 30.0);
    assert_eq!(body["missing_data"], "pass_through");
}
