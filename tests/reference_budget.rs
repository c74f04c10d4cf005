mod common;

use eps_sim::power::PowerBudget;
use eps_sim::power::bus::nominal_total;
use eps_sim::power::charge::{charging_time, remaining_energy};

use common::{assert_close, reference_buses, reference_inputs};

#[test]
fn reference_budget_matches_hand_calculation() {
    let b = PowerBudget::compute(&reference_buses(), &reference_inputs())
        .expect("reference budget should compute");

    assert_close(b.nominal_total_w, 60.65, 1e-9);
    assert_close(b.eol_total_w, 75.8125, 1e-9);
    assert_close(b.margin_nominal_w, 89.35, 1e-9);
    assert_close(b.margin_eol_w, 74.1875, 1e-9);
    assert_close(b.excess_power_w, 104.1875, 1e-9);
    assert_close(b.charge_power_w, 93.76875, 1e-9);
    assert_close(b.remaining_energy_wh, 30.0, 1e-9);

    let t = b.analytical_charge_time_h.unwrap();
    assert_close(t, 0.3199, 1e-4);
    assert_close(t * 60.0, 19.196, 1e-3);
}

#[test]
fn budget_from_config_matches_direct_computation() {
    let direct = PowerBudget::compute(&reference_buses(), &reference_inputs()).unwrap();
    let from_cfg = PowerBudget::from_config(&eps_sim::config::ScenarioConfig::baseline()).unwrap();
    assert_eq!(direct, from_cfg);
}

#[test]
fn degradation_scales_load_linearly() {
    let mut inputs = reference_inputs();
    let nominal = nominal_total(&reference_buses());
    for alpha in [0.0, 0.1, 0.25, 0.5, 1.0] {
        inputs.degradation_alpha = alpha;
        let b = PowerBudget::compute(&reference_buses(), &inputs).unwrap();
        assert_close(b.eol_total_w, nominal * (1.0 + alpha), 1e-9);
        assert!(b.eol_total_w >= b.nominal_total_w);
    }
}

#[test]
fn charging_time_times_power_recovers_energy() {
    let remaining = remaining_energy(100.0, 0.70);
    let t = charging_time(remaining, 104.1875, 0.9).unwrap();
    assert_close(t * 0.9 * 104.1875, remaining, 1e-9);
}

#[test]
fn over_budget_is_reported_not_rejected() {
    let mut inputs = reference_inputs();
    inputs.eps_max_w = 70.0;
    let b = PowerBudget::compute(&reference_buses(), &inputs)
        .expect("over-budget inputs should still compute");
    assert!(b.nominal_compliant());
    assert!(!b.eol_compliant());
    assert!(b.margin_eol_w < 0.0);
}
