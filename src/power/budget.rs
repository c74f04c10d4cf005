//! Static EPS power budget: EOL degradation, margin, and solar surplus.

use std::fmt;

use serde::Serialize;

use crate::config::ScenarioConfig;
use crate::error::{EpsError, ensure_finite};

use super::bus::{BusLoad, nominal_total, per_bus_power};
use super::charge::{charge_power, charging_time, remaining_energy};

/// End-of-life load after degradation: `P_nominal · (1 + α)` (W).
///
/// `alpha` is a caller contract (`α ≥ 0`); configuration validation rejects
/// negative values before they reach this function.
pub fn eol_total(nominal_w: f64, alpha: f64) -> f64 {
    nominal_w * (1.0 + alpha)
}

/// Headroom of the EPS against a load: `P_max − P_load` (W).
///
/// A negative result is an over-budget condition, reported rather than
/// treated as an error.
pub fn margin(max_power_w: f64, load_w: f64) -> f64 {
    max_power_w - load_w
}

/// Whether a margin keeps the load within EPS capability.
pub fn margin_compliant(margin_w: f64) -> bool {
    margin_w >= 0.0
}

/// Solar power left after serving the load: `P_solar − P_load` (W).
///
/// Negative values describe the discharge regime.
pub fn solar_excess(solar_w: f64, load_w: f64) -> f64 {
    solar_w - load_w
}

/// Scalar inputs of the budget besides the bus set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetInputs {
    /// EOL degradation factor α (dimensionless, ≥ 0).
    pub degradation_alpha: f64,
    /// Maximum continuous EPS output (W).
    pub eps_max_w: f64,
    /// Solar array generation (W).
    pub solar_w: f64,
    /// Battery capacity (Wh).
    pub capacity_wh: f64,
    /// Initial state of charge (fraction).
    pub initial_soc: f64,
    /// Charging efficiency η (fraction).
    pub eta_charge: f64,
}

/// Snapshot of the static power budget derived from the bus set and scalars.
///
/// Recomputed on demand; carries no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerBudget {
    /// Per-bus power in bus order (W).
    pub per_bus_w: Vec<f64>,
    /// Sum of bus power (W).
    pub nominal_total_w: f64,
    /// Nominal load after EOL degradation (W).
    pub eol_total_w: f64,
    /// EPS headroom against the nominal load (W).
    pub margin_nominal_w: f64,
    /// EPS headroom against the EOL load (W).
    pub margin_eol_w: f64,
    /// Solar array generation (W).
    pub solar_generation_w: f64,
    /// Solar surplus over the EOL load (W); negative means deficit.
    pub excess_power_w: f64,
    /// Stored-power rate `η · excess` (W).
    pub charge_power_w: f64,
    /// Battery headroom at the initial SoC (Wh).
    pub remaining_energy_wh: f64,
    /// Closed-form time to full charge (h), if charging is possible.
    pub analytical_charge_time_h: Option<f64>,
}

impl PowerBudget {
    /// Computes the budget from a bus set and scalar inputs.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::NonFinite`] if any derived quantity is NaN or infinite.
    pub fn compute(buses: &[BusLoad], inputs: &BudgetInputs) -> Result<Self, EpsError> {
        let per_bus_w = per_bus_power(buses);
        let nominal_total_w = ensure_finite("nominal_total_w", nominal_total(buses))?;
        let eol_total_w = ensure_finite(
            "eol_total_w",
            eol_total(nominal_total_w, inputs.degradation_alpha),
        )?;
        let margin_nominal_w =
            ensure_finite("margin_nominal_w", margin(inputs.eps_max_w, nominal_total_w))?;
        let margin_eol_w = ensure_finite("margin_eol_w", margin(inputs.eps_max_w, eol_total_w))?;
        let solar_generation_w = ensure_finite("solar_generation_w", inputs.solar_w)?;
        let excess_power_w =
            ensure_finite("excess_power_w", solar_excess(solar_generation_w, eol_total_w))?;
        let charge_power_w =
            ensure_finite("charge_power_w", charge_power(excess_power_w, inputs.eta_charge))?;
        let remaining_energy_wh = ensure_finite(
            "remaining_energy_wh",
            remaining_energy(inputs.capacity_wh, inputs.initial_soc),
        )?;
        let analytical_charge_time_h =
            charging_time(remaining_energy_wh, excess_power_w, inputs.eta_charge);

        Ok(Self {
            per_bus_w,
            nominal_total_w,
            eol_total_w,
            margin_nominal_w,
            margin_eol_w,
            solar_generation_w,
            excess_power_w,
            charge_power_w,
            remaining_energy_wh,
            analytical_charge_time_h,
        })
    }

    /// Computes the budget for a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::NonFinite`] if any derived quantity is NaN or infinite.
    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self, EpsError> {
        let inputs = BudgetInputs {
            degradation_alpha: cfg.power.degradation_alpha,
            eps_max_w: cfg.power.eps_max_w,
            solar_w: cfg.power.solar_w,
            capacity_wh: cfg.battery.capacity_wh,
            initial_soc: cfg.battery.initial_soc,
            eta_charge: cfg.battery.eta_charge,
        };
        Self::compute(&cfg.bus_loads(), &inputs)
    }

    /// Whether the nominal load fits within the EPS limit.
    pub fn nominal_compliant(&self) -> bool {
        margin_compliant(self.margin_nominal_w)
    }

    /// Whether the EOL load fits within the EPS limit.
    pub fn eol_compliant(&self) -> bool {
        margin_compliant(self.margin_eol_w)
    }
}

fn compliance_mark(ok: bool) -> &'static str {
    if ok { "COMPLIANT" } else { "OVERLOAD" }
}

impl fmt::Display for PowerBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Power Budget ---")?;
        for (i, p) in self.per_bus_w.iter().enumerate() {
            writeln!(f, "Bus {:<2}                 {:>9.3} W", i + 1, p)?;
        }
        writeln!(f, "Nominal load:          {:>9.3} W", self.nominal_total_w)?;
        writeln!(f, "EOL load:              {:>9.3} W", self.eol_total_w)?;
        writeln!(
            f,
            "Margin (nominal):      {:>9.3} W  [{}]",
            self.margin_nominal_w,
            compliance_mark(self.nominal_compliant())
        )?;
        writeln!(
            f,
            "Margin (EOL):          {:>9.3} W  [{}]",
            self.margin_eol_w,
            compliance_mark(self.eol_compliant())
        )?;
        writeln!(f, "Solar generation:      {:>9.3} W", self.solar_generation_w)?;
        writeln!(f, "Excess power:          {:>9.3} W", self.excess_power_w)?;
        writeln!(f, "Charge power (η·P):    {:>9.3} W", self.charge_power_w)?;
        writeln!(f, "Remaining capacity:    {:>9.3} Wh", self.remaining_energy_wh)?;
        match self.analytical_charge_time_h {
            Some(t) => write!(
                f,
                "Analytical charge time: {:.2} min ({:.4} h)",
                t * 60.0,
                t
            ),
            None => write!(f, "Analytical charge time: n/a (no charging power)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_inputs() -> BudgetInputs {
        BudgetInputs {
            degradation_alpha: 0.25,
            eps_max_w: 150.0,
            solar_w: 180.0,
            capacity_wh: 100.0,
            initial_soc: 0.70,
            eta_charge: 0.90,
        }
    }

    fn reference_buses() -> Vec<BusLoad> {
        vec![
            BusLoad::new("28V", 28.0, 1.2),
            BusLoad::new("12V", 12.0, 0.8),
            BusLoad::new("5V", 5.0, 2.5),
            BusLoad::new("3V3", 3.3, 1.5),
        ]
    }

    #[test]
    fn eol_total_is_exact_product() {
        let nominal = 60.65;
        assert_eq!(eol_total(nominal, 0.25), nominal * 1.25);
        assert_eq!(eol_total(nominal, 0.0), nominal);
    }

    #[test]
    fn margin_can_go_negative() {
        assert_eq!(margin(150.0, 200.0), -50.0);
        assert!(!margin_compliant(-50.0));
        assert!(margin_compliant(0.0));
    }

    #[test]
    fn solar_excess_negative_in_eclipse() {
        assert!(solar_excess(0.0, 75.8125) < 0.0);
    }

    #[test]
    fn reference_budget_values() {
        let b = PowerBudget::compute(&reference_buses(), &reference_inputs())
            .expect("reference budget should compute");

        assert!((b.nominal_total_w - 60.65).abs() < 1e-9);
        assert!((b.eol_total_w - 75.8125).abs() < 1e-9);
        assert!((b.margin_nominal_w - 89.35).abs() < 1e-9);
        assert!((b.margin_eol_w - 74.1875).abs() < 1e-9);
        assert!((b.excess_power_w - 104.1875).abs() < 1e-9);
        assert!((b.charge_power_w - 93.76875).abs() < 1e-9);
        assert!((b.remaining_energy_wh - 30.0).abs() < 1e-9);
        let t = b.analytical_charge_time_h.unwrap();
        assert!((t - 0.3199).abs() < 1e-4);
        assert!(b.nominal_compliant());
        assert!(b.eol_compliant());
    }

    #[test]
    fn eclipse_budget_has_no_charge_time() {
        let inputs = BudgetInputs {
            solar_w: 0.0,
            ..reference_inputs()
        };
        let b = PowerBudget::compute(&reference_buses(), &inputs).unwrap();
        assert!(b.excess_power_w < 0.0);
        assert_eq!(b.analytical_charge_time_h, None);
    }

    #[test]
    fn non_finite_input_is_a_numeric_anomaly() {
        let inputs = BudgetInputs {
            solar_w: f64::NAN,
            ..reference_inputs()
        };
        let b = PowerBudget::compute(&reference_buses(), &inputs);
        assert!(matches!(b, Err(EpsError::NonFinite { .. })));
    }

    #[test]
    fn display_marks_overload() {
        let inputs = BudgetInputs {
            eps_max_w: 70.0,
            ..reference_inputs()
        };
        let text = PowerBudget::compute(&reference_buses(), &inputs)
            .unwrap()
            .to_string();
        assert!(text.contains("COMPLIANT"));
        assert!(text.contains("OVERLOAD"));
    }
}
