//! REST API for a completed scenario run.
//!
//! Provides three GET endpoints:
//! - `/budget`: static power budget with compliance flags
//! - `/trace`: simulation trace with optional inclusive step range
//! - `/state`: scenario, summary, and latest sample

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::ScenarioConfig;
use crate::power::PowerBudget;
use crate::runner::ScenarioRun;
use crate::sim::{SimulationTrace, TraceSummary};

pub use types::{BudgetResponse, ErrorResponse, StateResponse, TraceQuery, TraceRecord};

/// Read-only state shared by every handler.
///
/// Built once after the run completes and wrapped in `Arc`.
pub struct AppState {
    pub scenario: ScenarioConfig,
    pub budget: PowerBudget,
    pub trace: SimulationTrace,
    pub summary: TraceSummary,
}

impl From<ScenarioRun> for AppState {
    fn from(run: ScenarioRun) -> Self {
        Self {
            scenario: run.config,
            budget: run.budget,
            trace: run.trace,
            summary: run.summary,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/budget", get(handlers::get_budget))
        .route("/trace", get(handlers::get_trace))
        .route("/state", get(handlers::get_state))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
