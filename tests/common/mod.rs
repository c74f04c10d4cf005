//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use eps_sim::config::ScenarioConfig;
use eps_sim::power::{BudgetInputs, BusLoad};
use eps_sim::runner::{ScenarioRun, run_scenario};

/// One-minute timestep (h).
pub const DT_MIN: f64 = 1.0 / 60.0;

/// Reference rails: 28 V/1.2 A, 12 V/0.8 A, 5 V/2.5 A, 3.3 V/1.5 A.
pub fn reference_buses() -> Vec<BusLoad> {
    vec![
        BusLoad::new("28V", 28.0, 1.2),
        BusLoad::new("12V", 12.0, 0.8),
        BusLoad::new("5V", 5.0, 2.5),
        BusLoad::new("3V3", 3.3, 1.5),
    ]
}

/// Reference scalars: α 0.25, 150 W EPS, 180 W solar, 100 Wh at 70 %, η 0.9.
pub fn reference_inputs() -> BudgetInputs {
    BudgetInputs {
        degradation_alpha: 0.25,
        eps_max_w: 150.0,
        solar_w: 180.0,
        capacity_wh: 100.0,
        initial_soc: 0.70,
        eta_charge: 0.90,
    }
}

/// Reference scenario with a custom timestep and duration.
pub fn reference_with_timing(dt_h: f64, duration_h: f64) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.simulation.dt_h = dt_h;
    cfg.simulation.duration_h = duration_h;
    cfg
}

/// Runs a scenario that is expected to succeed.
pub fn run_ok(cfg: &ScenarioConfig) -> ScenarioRun {
    run_scenario(cfg).expect("scenario should run")
}

/// Asserts `|actual - expected| <= tol`.
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} ± {tol}, got {actual}"
    );
}
