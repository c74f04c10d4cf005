//! Step-by-step simulation runner and TUI application state.

use std::collections::VecDeque;
use std::time::Instant;

use crate::config::ScenarioConfig;
use crate::error::EpsError;
use crate::power::PowerBudget;
use crate::sim::{Engine, PriorityRouter, TraceSample};

/// Maximum number of samples kept for the rolling chart.
const MAX_HISTORY: usize = 500;

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [1000, 500, 250, 100, 50, 10];

/// Default speed index (250 ms).
const DEFAULT_SPEED_IDX: usize = 2;

/// TUI application state.
pub struct App {
    engine: Engine<PriorityRouter>,
    /// Active scenario, kept for restart.
    scenario: ScenarioConfig,
    /// Rolling history of trace samples for the chart.
    pub history: VecDeque<TraceSample>,
    /// Next timestep to execute.
    pub timestep: usize,
    pub total_steps: usize,
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    pub quit: bool,
    /// When the last simulation tick ran.
    pub last_tick: Instant,
    pub preset_name: String,
    /// Error that halted the run, if any.
    pub error: Option<String>,
}

impl App {
    /// Creates an app for a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::Config`] if the preset is unknown or invalid.
    pub fn new(preset: &str) -> Result<Self, EpsError> {
        let scenario = ScenarioConfig::from_preset(preset)?;
        let engine = Engine::from_scenario(&scenario)?;
        let total_steps = engine.config().steps;
        Ok(Self {
            engine,
            scenario,
            history: VecDeque::with_capacity(MAX_HISTORY),
            timestep: 0,
            total_steps,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
            preset_name: preset.to_string(),
            error: None,
        })
    }

    /// Advances the simulation by one step unless finished or halted.
    pub fn tick(&mut self) {
        if self.is_finished() {
            return;
        }
        match self.engine.step(self.timestep) {
            Ok(sample) => {
                if self.history.len() >= MAX_HISTORY {
                    self.history.pop_front();
                }
                self.history.push_back(sample);
                self.timestep += 1;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.paused = true;
            }
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Shortens the tick interval.
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Lengthens the tick interval.
    pub fn speed_down(&mut self) {
        self.speed_idx = self.speed_idx.saturating_sub(1);
    }

    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Switches to another preset and starts over. Unknown names are ignored.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(scenario) = ScenarioConfig::from_preset(name) else {
            return;
        };
        let Ok(engine) = Engine::from_scenario(&scenario) else {
            return;
        };
        self.total_steps = engine.config().steps;
        self.engine = engine;
        self.scenario = scenario;
        self.history.clear();
        self.timestep = 0;
        self.paused = false;
        self.error = None;
        self.preset_name = name.to_string();
    }

    /// Restarts the current preset from the beginning.
    pub fn restart(&mut self) {
        let name = self.preset_name.clone();
        self.switch_preset(&name);
    }

    /// State of charge after the latest step, or the initial value.
    pub fn battery_soc(&self) -> f64 {
        self.history
            .back()
            .map_or(self.scenario.battery.initial_soc, |s| {
                s.battery.state_of_charge
            })
    }

    pub fn is_finished(&self) -> bool {
        self.timestep >= self.total_steps
    }

    pub fn last_sample(&self) -> Option<&TraceSample> {
        self.history.back()
    }

    pub fn budget(&self) -> &PowerBudget {
        self.engine.budget()
    }

    pub fn scenario(&self) -> &ScenarioConfig {
        &self.scenario
    }

    /// Closed-form SoC at time `t_h`, saturating at full.
    pub fn analytical_soc(&self, t_h: f64) -> f64 {
        let b = &self.scenario.battery;
        let stored_wh = self.budget().charge_power_w.max(0.0) * t_h;
        ((b.capacity_wh * b.initial_soc + stored_wh) / b.capacity_wh).min(1.0)
    }
}
