//! Core simulation types: timing configuration and the recorded trace.

use std::fmt;

use serde::Serialize;

use crate::config::ConfigError;
use crate::error::EpsError;

use super::battery::BatteryState;
use super::router::RoutingAllocation;

/// Timing parameters shared by the clock, engine, and trace.
///
/// # Examples
///
/// ```
/// use eps_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::from_duration(1.0 / 60.0, 0.5).unwrap();
/// assert_eq!(cfg.steps, 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimConfig {
    /// Step length (h).
    pub dt_h: f64,
    /// Number of steps to run.
    pub steps: usize,
}

impl SimConfig {
    /// Creates a timing configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::Config`] if `dt_h` is not finite and positive.
    pub fn new(dt_h: f64, steps: usize) -> Result<Self, EpsError> {
        if !(dt_h.is_finite() && dt_h > 0.0) {
            return Err(
                ConfigError::new("simulation.dt_h", format!("must be finite and > 0, got {dt_h}"))
                    .into(),
            );
        }
        Ok(Self { dt_h, steps })
    }

    /// Creates a configuration covering `duration_h`, with
    /// `round(duration_h / dt_h)` steps.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::Config`] if either value is not finite and
    /// positive, or if `dt_h` exceeds `duration_h`.
    pub fn from_duration(dt_h: f64, duration_h: f64) -> Result<Self, EpsError> {
        if !(duration_h.is_finite() && duration_h > 0.0) {
            return Err(ConfigError::new(
                "simulation.duration_h",
                format!("must be finite and > 0, got {duration_h}"),
            )
            .into());
        }
        if dt_h > duration_h {
            return Err(ConfigError::new(
                "simulation.dt_h",
                format!("must not exceed duration_h ({duration_h}), got {dt_h}"),
            )
            .into());
        }
        let cfg = Self::new(dt_h, 0)?;
        Ok(Self {
            steps: (duration_h / dt_h).round() as usize,
            ..cfg
        })
    }
}

/// Record of one simulated timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceSample {
    /// Step index, starting at 0.
    pub timestep: usize,
    /// Simulated time at the end of the step (h).
    pub time_h: f64,
    /// Battery state after the step.
    pub battery: BatteryState,
    /// Routing decision taken at the start of the step.
    pub allocation: RoutingAllocation,
    /// Power actually stored, `η · battery_w` (W).
    pub charge_w: f64,
}

impl fmt::Display for TraceSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} ({:>7.4} h) | E={:>8.3} Wh  SoC={:>6.2}% | bat={:>8.3} W  \
             shunt={:>8.3} W  stored={:>8.3} W{}",
            self.timestep,
            self.time_h,
            self.battery.energy_wh,
            self.battery.state_of_charge * 100.0,
            self.allocation.battery_w,
            self.allocation.shunt_w,
            self.charge_w,
            if self.allocation.battery_full { "  [full]" } else { "" }
        )
    }
}

/// Ordered, append-only record of a simulation run.
///
/// Filled by the engine; read-only to everyone else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationTrace {
    /// Step length (h).
    pub dt_h: f64,
    /// Battery state before the first step.
    pub initial: BatteryState,
    samples: Vec<TraceSample>,
}

impl SimulationTrace {
    /// Creates an empty trace starting from `initial`.
    pub fn new(dt_h: f64, initial: BatteryState) -> Self {
        Self {
            dt_h,
            initial,
            samples: Vec::new(),
        }
    }

    /// Creates a trace from already recorded samples.
    pub fn from_samples(dt_h: f64, initial: BatteryState, samples: Vec<TraceSample>) -> Self {
        Self {
            dt_h,
            initial,
            samples,
        }
    }

    pub(crate) fn push(&mut self, sample: TraceSample) {
        self.samples.push(sample);
    }

    /// All samples in step order.
    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&TraceSample> {
        self.samples.last()
    }

    /// Battery state after the last step, or the initial state if no step ran.
    pub fn final_state(&self) -> BatteryState {
        self.last().map_or(self.initial, |s| s.battery)
    }

    /// Samples with `from <= timestep <= to`, clamped to the recorded range.
    pub fn window(&self, from: usize, to: usize) -> &[TraceSample] {
        if from > to || from >= self.samples.len() {
            return &[];
        }
        let end = to.saturating_add(1).min(self.samples.len());
        &self.samples[from..end]
    }

    /// End-of-step time of the first sample whose energy reaches `energy_wh`.
    pub fn first_time_at_or_above(&self, energy_wh: f64) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| s.battery.energy_wh >= energy_wh)
            .map(|s| s.time_h)
    }

    /// First step at which routing found the battery at its SoC ceiling.
    pub fn first_full_step(&self) -> Option<usize> {
        self.samples
            .iter()
            .find(|s| s.allocation.battery_full)
            .map(|s| s.timestep)
    }
}

impl<'a> IntoIterator for &'a SimulationTrace {
    type Item = &'a TraceSample;
    type IntoIter = std::slice::Iter<'a, TraceSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestep: usize, energy_wh: f64, battery_full: bool) -> TraceSample {
        TraceSample {
            timestep,
            time_h: (timestep + 1) as f64 * 0.5,
            battery: BatteryState::new(energy_wh, 100.0),
            allocation: RoutingAllocation {
                surplus_w: 10.0,
                battery_w: if battery_full { 0.0 } else { 10.0 },
                payload_w: 0.0,
                supercapacitor_w: 0.0,
                shunt_w: if battery_full { 10.0 } else { 0.0 },
                battery_full,
            },
            charge_w: if battery_full { 0.0 } else { 9.0 },
        }
    }

    fn trace() -> SimulationTrace {
        SimulationTrace::from_samples(
            0.5,
            BatteryState::new(80.0, 100.0),
            vec![
                sample(0, 90.0, false),
                sample(1, 100.0, false),
                sample(2, 100.0, true),
            ],
        )
    }

    #[test]
    fn sim_config_rounds_step_count() {
        assert_eq!(SimConfig::from_duration(1.0 / 60.0, 0.5).unwrap().steps, 30);
        assert_eq!(SimConfig::from_duration(0.3, 1.0).unwrap().steps, 3);
        assert_eq!(SimConfig::from_duration(0.4, 1.0).unwrap().steps, 3);
    }

    #[test]
    fn sim_config_rejects_bad_timing() {
        assert!(SimConfig::new(0.0, 10).is_err());
        assert!(SimConfig::new(f64::NAN, 10).is_err());
        assert!(SimConfig::from_duration(1.0, 0.5).is_err());
        assert!(SimConfig::from_duration(0.1, -1.0).is_err());
    }

    #[test]
    fn final_state_falls_back_to_initial() {
        let empty = SimulationTrace::new(0.5, BatteryState::new(42.0, 100.0));
        assert!(empty.is_empty());
        assert_eq!(empty.final_state().energy_wh, 42.0);
        assert_eq!(trace().final_state().energy_wh, 100.0);
    }

    #[test]
    fn window_is_inclusive_and_clamped() {
        let t = trace();
        assert_eq!(t.window(0, 1).len(), 2);
        assert_eq!(t.window(1, 99).len(), 2);
        assert!(t.window(2, 1).is_empty());
        assert!(t.window(5, 9).is_empty());
    }

    #[test]
    fn threshold_and_full_queries() {
        let t = trace();
        assert_eq!(t.first_time_at_or_above(99.99), Some(1.0));
        assert_eq!(t.first_time_at_or_above(101.0), None);
        assert_eq!(t.first_full_step(), Some(2));
    }

    #[test]
    fn sample_display_flags_full_battery() {
        let text = sample(2, 100.0, true).to_string();
        assert!(text.contains("[full]"));
        assert!(!sample(0, 90.0, false).to_string().contains("[full]"));
    }
}
