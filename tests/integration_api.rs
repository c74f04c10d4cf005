//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use eps_sim::api::{AppState, router};
use eps_sim::config::ScenarioConfig;

fn build_api_state(cfg: &ScenarioConfig) -> Arc<AppState> {
    Arc::new(AppState::from(common::run_ok(cfg)))
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(state);
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn trace_matches_simulation_length() {
    let state = build_api_state(&ScenarioConfig::baseline());
    let (status, json) = get(state, "/trace").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 30);
    assert_eq!(rows[19]["energy_wh"], 100.0);
    assert_eq!(rows[20]["battery_full"], true);
}

#[tokio::test]
async fn trace_range_beyond_end_is_clamped() {
    let state = build_api_state(&ScenarioConfig::baseline());
    let (status, json) = get(state, "/trace?from=25&to=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn budget_reports_overload_for_eol_preset() {
    let state = build_api_state(&ScenarioConfig::eol_overload());
    let (status, json) = get(state, "/budget").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["nominal_compliant"], true);
    assert_eq!(json["eol_compliant"], false);
}

#[tokio::test]
async fn state_reflects_scenario_and_summary() {
    let state = build_api_state(&ScenarioConfig::cell_health());
    let (status, json) = get(state, "/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["scenario"]["simulation"]["routing"], "headroom_capped");
    assert_eq!(json["scenario"]["battery"]["soc_upper_limit"], 0.95);
    let final_energy = json["summary"]["final_energy_wh"].as_f64().unwrap();
    assert!((final_energy - 95.0).abs() < 1e-6);
    assert_eq!(json["latest_step"]["timestep"], 29);
}

#[tokio::test]
async fn eclipse_state_reports_deficit_not_dissipation() {
    let state = build_api_state(&ScenarioConfig::eclipse());
    let (status, json) = get(state, "/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["summary"]["shunt_energy_wh"], 0.0);
    let deficit = json["summary"]["deficit_wh"].as_f64().unwrap();
    assert!((deficit - 37.906).abs() < 1e-3);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = router(build_api_state(&ScenarioConfig::baseline()));
    let req = Request::builder()
        .uri("/telemetry")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
