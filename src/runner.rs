//! One-call scenario execution: budget, simulation, and summary.

use tracing::{info, warn};

use crate::config::ScenarioConfig;
use crate::error::EpsError;
use crate::power::PowerBudget;
use crate::sim::{Engine, SimulationTrace, TraceSummary};

/// Everything produced by one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub config: ScenarioConfig,
    pub budget: PowerBudget,
    pub trace: SimulationTrace,
    pub summary: TraceSummary,
}

/// Validates a scenario, computes its budget, and simulates it.
///
/// # Errors
///
/// Returns [`EpsError::Config`] listing every violated rule, or
/// [`EpsError::NonFinite`] if a numeric anomaly halts the run.
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioRun, EpsError> {
    let mut engine = Engine::from_scenario(config)?;
    let budget = engine.budget().clone();

    if !budget.nominal_compliant() {
        warn!(
            margin_w = budget.margin_nominal_w,
            "nominal load exceeds EPS capability"
        );
    } else if !budget.eol_compliant() {
        warn!(
            margin_w = budget.margin_eol_w,
            "EOL load exceeds EPS capability"
        );
    }
    info!(
        nominal_w = budget.nominal_total_w,
        eol_w = budget.eol_total_w,
        excess_w = budget.excess_power_w,
        "power budget computed"
    );

    let trace = engine.run()?;
    let summary = TraceSummary::from_trace(&trace);

    Ok(ScenarioRun {
        config: config.clone(),
        budget,
        trace,
        summary,
    })
}
