//! Simulation engine that drives routing and battery integration.

use tracing::{debug, info, warn};

use crate::config::ScenarioConfig;
use crate::error::{EpsError, ensure_finite};
use crate::power::PowerBudget;

use super::battery::BatteryIntegrator;
use super::clock::Clock;
use super::router::{BatteryPolicy, PriorityRouter, Router};
use super::types::{SimConfig, SimulationTrace, TraceSample};

/// Simulation engine owning the battery, router, and timing.
///
/// Generic over `R: Router` for static dispatch. The surplus is taken from
/// the static budget and held constant across the run.
pub struct Engine<R: Router> {
    config: SimConfig,
    budget: PowerBudget,
    router: R,
    battery: BatteryIntegrator,
    eta_charge: f64,
}

impl<R: Router> Engine<R> {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Timing configuration
    /// * `budget` - Static power budget supplying the surplus
    /// * `router` - Surplus routing strategy
    /// * `battery` - Battery integrator at its initial state
    /// * `eta_charge` - Charging efficiency applied to the battery allocation
    pub fn new(
        config: SimConfig,
        budget: PowerBudget,
        router: R,
        battery: BatteryIntegrator,
        eta_charge: f64,
    ) -> Self {
        Self {
            config,
            budget,
            router,
            battery,
            eta_charge,
        }
    }

    /// Executes one timestep and returns its record.
    ///
    /// Routing sees the battery state from the start of the step; the
    /// returned sample carries the state after integration.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::NonFinite`] if any routed or stored power is NaN
    /// or infinite.
    pub fn step(&mut self, t: usize) -> Result<TraceSample, EpsError> {
        let before = self.battery.state();
        let allocation = self.router.route(self.budget.excess_power_w, &before)?;
        let charge_w = ensure_finite("charge_w", self.eta_charge * allocation.battery_w)?;
        let after = self.battery.step(charge_w, self.config.dt_h)?;

        debug!(
            step = t,
            energy_wh = after.energy_wh,
            soc = after.state_of_charge,
            battery_w = allocation.battery_w,
            shunt_w = allocation.shunt_w,
            "step complete"
        );

        Ok(TraceSample {
            timestep: t,
            time_h: (t + 1) as f64 * self.config.dt_h,
            battery: after,
            allocation,
            charge_w,
        })
    }

    /// Executes every timestep and returns the full trace.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns its error.
    pub fn run(&mut self) -> Result<SimulationTrace, EpsError> {
        let mut trace = SimulationTrace::new(self.config.dt_h, self.battery.state());
        let mut clock = Clock::new(self.config.steps, self.config.dt_h);

        info!(
            steps = self.config.steps,
            dt_h = self.config.dt_h,
            surplus_w = self.budget.excess_power_w,
            "simulation started"
        );
        if self.budget.excess_power_w < 0.0 {
            warn!(
                surplus_w = self.budget.excess_power_w,
                "solar generation below EOL load; battery receives no charge"
            );
        }

        let mut was_full = false;
        while let Some(t) = clock.tick() {
            let sample = self.step(t)?;
            if sample.allocation.battery_full && !was_full {
                info!(
                    step = t,
                    time_h = clock.end_of_step_h(t),
                    "battery at SoC ceiling; surplus diverted to shunt"
                );
            }
            was_full = sample.allocation.battery_full;
            trace.push(sample);
        }

        let last = trace.final_state();
        info!(
            energy_wh = last.energy_wh,
            soc = last.state_of_charge,
            elapsed_h = clock.elapsed_h(),
            "simulation finished"
        );
        Ok(trace)
    }

    /// Returns the static budget driving the run.
    pub fn budget(&self) -> &PowerBudget {
        &self.budget
    }

    /// Returns the timing configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

impl Engine<PriorityRouter> {
    /// Builds an engine with the standard priority router from a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::Config`] with every violated rule if the scenario
    /// fails validation, or [`EpsError::NonFinite`] if the budget overflows.
    pub fn from_scenario(cfg: &ScenarioConfig) -> Result<Self, EpsError> {
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let budget = PowerBudget::from_config(cfg)?;
        let config = SimConfig::from_duration(cfg.simulation.dt_h, cfg.simulation.duration_h)?;
        let battery = BatteryIntegrator::new(cfg.battery.capacity_wh, cfg.battery.initial_soc)?;
        let policy = match cfg.simulation.routing.as_str() {
            "headroom_capped" => BatteryPolicy::HeadroomCapped {
                eta_charge: cfg.battery.eta_charge,
                dt_h: config.dt_h,
            },
            _ => BatteryPolicy::Reference,
        };
        let router = PriorityRouter::new(cfg.battery.soc_upper_limit, policy);

        Ok(Self::new(
            config,
            budget,
            router,
            battery,
            cfg.battery.eta_charge,
        ))
    }
}
