//! Regulated power bus loads.

use serde::Serialize;

/// A regulated power rail and the load current drawn from it.
///
/// Bus loads are fixed at construction; the budget treats them as
/// pre-validated constants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusLoad {
    /// Human-readable rail label (e.g. `"28V"`).
    pub name: String,
    /// Rail voltage (V).
    pub voltage_v: f64,
    /// Load current drawn from the rail (A).
    pub current_a: f64,
}

impl BusLoad {
    /// Creates a bus load.
    pub fn new(name: impl Into<String>, voltage_v: f64, current_a: f64) -> Self {
        Self {
            name: name.into(),
            voltage_v,
            current_a,
        }
    }

    /// Electrical power drawn from this rail: `voltage × current` (W).
    pub fn power_w(&self) -> f64 {
        bus_power(self.voltage_v, self.current_a)
    }
}

/// Per-bus power `P = V · I` (W).
pub fn bus_power(voltage_v: f64, current_a: f64) -> f64 {
    voltage_v * current_a
}

/// Per-bus power for every rail, in input order (W).
pub fn per_bus_power(buses: &[BusLoad]) -> Vec<f64> {
    buses.iter().map(BusLoad::power_w).collect()
}

/// Sum of per-bus power over the whole bus set (W).
pub fn nominal_total(buses: &[BusLoad]) -> f64 {
    buses.iter().map(BusLoad::power_w).sum()
}
