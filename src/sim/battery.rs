//! Battery energy state and its forward-Euler integrator.

use std::fmt;

use serde::Serialize;

use crate::config::ConfigError;
use crate::error::{EpsError, ensure_finite};

/// Snapshot of the battery at one instant.
///
/// `state_of_charge` is derived from the other two fields and kept alongside
/// them so traces and JSON output carry it without recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryState {
    /// Stored energy (Wh), always within `[0, capacity_wh]`.
    pub energy_wh: f64,
    /// Nameplate capacity (Wh).
    pub capacity_wh: f64,
    /// `energy_wh / capacity_wh`, within `[0, 1]`.
    pub state_of_charge: f64,
}

impl BatteryState {
    /// Builds a state from energy and capacity, deriving the state of charge.
    pub fn new(energy_wh: f64, capacity_wh: f64) -> Self {
        let state_of_charge = if capacity_wh > 0.0 {
            energy_wh / capacity_wh
        } else {
            0.0
        };
        Self {
            energy_wh,
            capacity_wh,
            state_of_charge,
        }
    }

    /// Energy the battery can still accept before reaching `soc_limit` (Wh).
    pub fn headroom_to_wh(&self, soc_limit: f64) -> f64 {
        (soc_limit * self.capacity_wh - self.energy_wh).max(0.0)
    }
}

impl fmt::Display for BatteryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}/{:.1} Wh ({:.2}%)",
            self.energy_wh,
            self.capacity_wh,
            self.state_of_charge * 100.0
        )
    }
}

/// Integrates stored battery energy over fixed timesteps.
///
/// Uses forward Euler, `E_{n+1} = clamp(E_n + P · Δt, 0, capacity)`, and
/// is agnostic to charging efficiency: callers pass the power that is
/// actually stored.
///
/// # Examples
///
/// ```
/// use eps_sim::sim::battery::BatteryIntegrator;
///
/// let mut battery = BatteryIntegrator::new(100.0, 0.5).unwrap();
/// let state = battery.step(60.0, 0.5).unwrap();
/// assert_eq!(state.energy_wh, 80.0);
/// ```
#[derive(Debug, Clone)]
pub struct BatteryIntegrator {
    energy_wh: f64,
    capacity_wh: f64,
}

impl BatteryIntegrator {
    /// Creates an integrator holding `capacity_wh · initial_soc`.
    ///
    /// # Arguments
    ///
    /// * `capacity_wh` - Nameplate capacity (Wh, > 0)
    /// * `initial_soc` - Starting state of charge (fraction in `[0, 1]`)
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::Config`] if capacity is not positive or the state
    /// of charge lies outside `[0, 1]`.
    pub fn new(capacity_wh: f64, initial_soc: f64) -> Result<Self, EpsError> {
        let mut errors = Vec::new();
        if !(capacity_wh.is_finite() && capacity_wh > 0.0) {
            errors.push(ConfigError::new(
                "battery.capacity_wh",
                format!("must be finite and > 0, got {capacity_wh}"),
            ));
        }
        if !(0.0..=1.0).contains(&initial_soc) {
            errors.push(ConfigError::new(
                "battery.initial_soc",
                format!("must be in [0, 1], got {initial_soc}"),
            ));
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
        Ok(Self {
            energy_wh: capacity_wh * initial_soc,
            capacity_wh,
        })
    }

    /// Current battery snapshot.
    pub fn state(&self) -> BatteryState {
        BatteryState::new(self.energy_wh, self.capacity_wh)
    }

    /// Advances stored energy by one timestep and returns the new state.
    ///
    /// Positive `power_w` charges, negative discharges. The result is
    /// clamped to `[0, capacity]`.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::NonFinite`] if the power or the energy delta is
    /// not finite, and [`EpsError::Config`] if `dt_h` is not positive.
    pub fn step(&mut self, power_w: f64, dt_h: f64) -> Result<BatteryState, EpsError> {
        let power_w = ensure_finite("battery power_w", power_w)?;
        let dt_h = ensure_finite("dt_h", dt_h)?;
        if dt_h <= 0.0 {
            return Err(
                ConfigError::new("simulation.dt_h", format!("must be > 0, got {dt_h}")).into(),
            );
        }
        let delta_wh = ensure_finite("battery delta_wh", power_w * dt_h)?;
        self.energy_wh = (self.energy_wh + delta_wh).clamp(0.0, self.capacity_wh);
        Ok(self.state())
    }
}

/// Integrates a battery under a constant surplus for a fixed number of steps.
///
/// Each step stores `eta · surplus_w · dt_h`. The returned series starts
/// with the initial state, so it holds `steps + 1` entries. The same
/// efficiency scales negative surplus.
///
/// # Errors
///
/// Propagates configuration and numeric errors from [`BatteryIntegrator`].
pub fn constant_power_series(
    capacity_wh: f64,
    initial_soc: f64,
    eta: f64,
    surplus_w: f64,
    dt_h: f64,
    steps: usize,
) -> Result<Vec<BatteryState>, EpsError> {
    let mut battery = BatteryIntegrator::new(capacity_wh, initial_soc)?;
    let charge_w = ensure_finite("charge_w", eta * surplus_w)?;
    let mut series = Vec::with_capacity(steps + 1);
    series.push(battery.state());
    for _ in 0..steps {
        series.push(battery.step(charge_w, dt_h)?);
    }
    Ok(series)
}
