//! Post-hoc summary of a simulation trace.

use std::fmt;

use serde::Serialize;

use super::types::SimulationTrace;

/// Fraction of capacity below which the battery still counts as not full
/// when reporting time-to-full.
pub const FULL_TOLERANCE: f64 = 1e-4;

/// Aggregate figures derived from a complete trace.
///
/// Computed from the recorded samples only, so they always agree with the
/// exported trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSummary {
    /// Number of recorded steps.
    pub steps: usize,
    /// Simulated time covered (h).
    pub duration_h: f64,
    /// Stored energy at the start (Wh).
    pub initial_energy_wh: f64,
    /// Stored energy after the last step (Wh).
    pub final_energy_wh: f64,
    /// State of charge after the last step.
    pub final_soc: f64,
    /// Net change in stored energy (Wh).
    pub energy_stored_wh: f64,
    /// Energy routed to the battery before efficiency losses (Wh).
    pub battery_input_wh: f64,
    /// Energy dissipated by the shunt (Wh). Only positive shunt allocations count.
    pub shunt_energy_wh: f64,
    /// Load energy the surplus could not cover (Wh, ≥ 0). Accumulated from
    /// negative shunt allocations, which mean power owed by the battery.
    pub deficit_wh: f64,
    /// First step at which routing found the battery at its SoC ceiling.
    pub first_full_step: Option<usize>,
    /// Time at which stored energy first reached capacity (h).
    pub time_to_full_h: Option<f64>,
}

impl TraceSummary {
    /// Computes the summary of a trace.
    pub fn from_trace(trace: &SimulationTrace) -> Self {
        let dt_h = trace.dt_h;
        let initial_energy_wh = trace.initial.energy_wh;
        let last = trace.final_state();

        let (battery_input_wh, shunt_energy_wh, deficit_wh) =
            trace
                .iter()
                .fold((0.0, 0.0, 0.0), |(bat, shunt, deficit), s| {
                    let shunt_w = s.allocation.shunt_w;
                    (
                        bat + s.allocation.battery_w * dt_h,
                        shunt + shunt_w.max(0.0) * dt_h,
                        deficit + (-shunt_w).max(0.0) * dt_h,
                    )
                });

        let full_threshold = trace.initial.capacity_wh * (1.0 - FULL_TOLERANCE);

        Self {
            steps: trace.len(),
            duration_h: trace.len() as f64 * dt_h,
            initial_energy_wh,
            final_energy_wh: last.energy_wh,
            final_soc: last.state_of_charge,
            energy_stored_wh: last.energy_wh - initial_energy_wh,
            battery_input_wh,
            shunt_energy_wh,
            deficit_wh,
            first_full_step: trace.first_full_step(),
            time_to_full_h: trace.first_time_at_or_above(full_threshold),
        }
    }
}

impl fmt::Display for TraceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Summary ---")?;
        writeln!(
            f,
            "Steps:                 {} ({:.4} h)",
            self.steps, self.duration_h
        )?;
        writeln!(
            f,
            "Battery energy:        {:.3} -> {:.3} Wh (SoC {:.2}%)",
            self.initial_energy_wh,
            self.final_energy_wh,
            self.final_soc * 100.0
        )?;
        writeln!(f, "Energy stored:         {:.3} Wh", self.energy_stored_wh)?;
        writeln!(f, "Routed to battery:     {:.3} Wh", self.battery_input_wh)?;
        writeln!(f, "Shunt dissipation:     {:.3} Wh", self.shunt_energy_wh)?;
        writeln!(f, "Unserved deficit:      {:.3} Wh", self.deficit_wh)?;
        match self.first_full_step {
            Some(step) => writeln!(f, "Battery at ceiling:    step {step}")?,
            None => writeln!(f, "Battery at ceiling:    never")?,
        }
        match self.time_to_full_h {
            Some(t) => write!(f, "Time to full:          {:.2} min ({:.4} h)", t * 60.0, t),
            None => write!(f, "Time to full:          not reached"),
        }
    }
}
