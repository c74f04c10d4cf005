//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{BudgetResponse, ErrorResponse, StateResponse, TraceQuery, TraceRecord};

/// `GET /budget` → 200 + `BudgetResponse` JSON
pub async fn get_budget(State(state): State<Arc<AppState>>) -> Json<BudgetResponse> {
    Json(BudgetResponse::from(&state.budget))
}

/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        scenario: state.scenario.clone(),
        summary: state.summary.clone(),
        latest_step: state.trace.last().map(TraceRecord::from),
    })
}

/// Returns trace records, optionally limited to an inclusive step range.
///
/// `GET /trace` → every sample
/// `GET /trace?from=N&to=M` → steps `N..=M`
/// `GET /trace?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_trace(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TraceQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<TraceRecord> = state
        .trace
        .window(from, to)
        .iter()
        .map(TraceRecord::from)
        .collect();

    Ok(Json(records))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::ScenarioConfig;
    use crate::runner::run_scenario;

    fn make_test_state() -> Arc<AppState> {
        let run = run_scenario(&ScenarioConfig::baseline()).unwrap();
        Arc::new(AppState::from(run))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn budget_returns_reference_values() {
        let (status, json) = get_json("/budget").await;
        assert_eq!(status, StatusCode::OK);
        let eol = json["eol_total_w"].as_f64().unwrap();
        assert!((eol - 75.8125).abs() < 1e-9);
        assert_eq!(json["eol_compliant"], true);
        assert_eq!(json["per_bus_w"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn state_has_scenario_summary_and_latest() {
        let (status, json) = get_json("/state").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.get("scenario").is_some());
        assert_eq!(json["summary"]["steps"], 30);
        assert_eq!(json["latest_step"]["timestep"], 29);
    }

    #[tokio::test]
    async fn trace_returns_all_steps() {
        let (status, json) = get_json("/trace").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(30));
    }

    #[tokio::test]
    async fn trace_range_query() {
        let (status, json) = get_json("/trace?from=5&to=10").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["timestep"], 5);
        assert_eq!(rows[5]["timestep"], 10);
    }

    #[tokio::test]
    async fn trace_invalid_range_returns_400() {
        let (status, json) = get_json("/trace?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }
}
