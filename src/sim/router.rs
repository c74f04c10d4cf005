//! Priority routing of surplus power to energy sinks.

use std::fmt;

use serde::Serialize;

use crate::error::{EpsError, ensure_finite};

use super::battery::BatteryState;

/// An energy sink that can receive surplus power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sink {
    Battery,
    Payload,
    Supercapacitor,
    Shunt,
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sink::Battery => "battery",
            Sink::Payload => "payload",
            Sink::Supercapacitor => "supercapacitor",
            Sink::Shunt => "shunt",
        };
        f.write_str(name)
    }
}

/// How the battery stage sizes its allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatteryPolicy {
    /// Takes the whole surplus whenever SoC is below the ceiling; the
    /// integrator clamps any overshoot.
    Reference,
    /// Takes at most what fills the battery to its SoC ceiling this step,
    /// `headroom / (η · Δt)`, and sends the rest downstream.
    HeadroomCapped { eta_charge: f64, dt_h: f64 },
}

/// Power-allocation decision for one timestep.
///
/// `battery_w + payload_w + supercapacitor_w + shunt_w` equals `surplus_w`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutingAllocation {
    /// Surplus offered to the router (W); negative in the discharge regime.
    pub surplus_w: f64,
    /// Power sent to the battery (W, ≥ 0).
    pub battery_w: f64,
    /// Power sent to the payload (W).
    pub payload_w: f64,
    /// Power sent to the supercapacitor (W).
    pub supercapacitor_w: f64,
    /// Residual power dissipated by the shunt (W).
    pub shunt_w: f64,
    /// Whether the battery had reached its SoC ceiling when routing ran.
    pub battery_full: bool,
}

impl RoutingAllocation {
    fn unallocated(surplus_w: f64, battery_full: bool) -> Self {
        Self {
            surplus_w,
            battery_w: 0.0,
            payload_w: 0.0,
            supercapacitor_w: 0.0,
            shunt_w: 0.0,
            battery_full,
        }
    }

    /// Sum of every sink's allocation (W).
    pub fn total_w(&self) -> f64 {
        self.battery_w + self.payload_w + self.supercapacitor_w + self.shunt_w
    }

    /// Allocation of a single sink (W).
    pub fn sink_w(&self, sink: Sink) -> f64 {
        match sink {
            Sink::Battery => self.battery_w,
            Sink::Payload => self.payload_w,
            Sink::Supercapacitor => self.supercapacitor_w,
            Sink::Shunt => self.shunt_w,
        }
    }

    fn add(&mut self, sink: Sink, power_w: f64) {
        match sink {
            Sink::Battery => self.battery_w += power_w,
            Sink::Payload => self.payload_w += power_w,
            Sink::Supercapacitor => self.supercapacitor_w += power_w,
            Sink::Shunt => self.shunt_w += power_w,
        }
    }
}

impl fmt::Display for RoutingAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "surplus {:.3} W -> battery {:.3} W | payload {:.3} W | \
             supercap {:.3} W | shunt {:.3} W{}",
            self.surplus_w,
            self.battery_w,
            self.payload_w,
            self.supercapacitor_w,
            self.shunt_w,
            if self.battery_full { " [battery full]" } else { "" }
        )
    }
}

/// One stage of the priority chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Charges the battery while SoC is below `soc_upper_limit`.
    Battery {
        soc_upper_limit: f64,
        policy: BatteryPolicy,
    },
    /// Payload sink; draws nothing in the current model.
    Payload,
    /// Supercapacitor sink; draws nothing in the current model.
    Supercapacitor,
    /// Absorbs whatever is left, including a negative remainder.
    Shunt,
}

impl Stage {
    /// Sink this stage feeds.
    pub fn sink(&self) -> Sink {
        match self {
            Stage::Battery { .. } => Sink::Battery,
            Stage::Payload => Sink::Payload,
            Stage::Supercapacitor => Sink::Supercapacitor,
            Stage::Shunt => Sink::Shunt,
        }
    }

    /// Power this stage takes out of `remaining_w`, given the battery
    /// state at the start of the step.
    pub fn allocate(&self, remaining_w: f64, battery: &BatteryState) -> f64 {
        match *self {
            Stage::Battery {
                soc_upper_limit,
                policy,
            } => {
                if remaining_w <= 0.0 || battery.state_of_charge >= soc_upper_limit {
                    return 0.0;
                }
                match policy {
                    BatteryPolicy::Reference => remaining_w,
                    BatteryPolicy::HeadroomCapped { eta_charge, dt_h } => {
                        let rate = eta_charge * dt_h;
                        if rate > 0.0 {
                            remaining_w.min(battery.headroom_to_wh(soc_upper_limit) / rate)
                        } else {
                            remaining_w
                        }
                    }
                }
            }
            Stage::Payload | Stage::Supercapacitor => 0.0,
            Stage::Shunt => remaining_w,
        }
    }
}

/// Splits a surplus among energy sinks.
pub trait Router {
    /// Allocates `surplus_w` given the battery state at the start of the step.
    ///
    /// # Errors
    ///
    /// Returns [`EpsError::NonFinite`] if the surplus is NaN or infinite.
    fn route(&self, surplus_w: f64, battery: &BatteryState)
    -> Result<RoutingAllocation, EpsError>;
}

/// Router that walks a fixed priority chain ending in a shunt.
///
/// Each stage sees only the remainder left by earlier stages, and the
/// shunt takes the final remainder, so the allocation always sums to the
/// surplus.
#[derive(Debug, Clone)]
pub struct PriorityRouter {
    soc_upper_limit: f64,
    stages: Vec<Stage>,
}

impl PriorityRouter {
    /// Builds the standard chain: battery, payload, supercapacitor, shunt.
    ///
    /// # Arguments
    ///
    /// * `soc_upper_limit` - SoC at or above which the battery stops charging
    /// * `policy` - Battery allocation policy
    pub fn new(soc_upper_limit: f64, policy: BatteryPolicy) -> Self {
        Self {
            soc_upper_limit,
            stages: vec![
                Stage::Battery {
                    soc_upper_limit,
                    policy,
                },
                Stage::Payload,
                Stage::Supercapacitor,
                Stage::Shunt,
            ],
        }
    }

    /// Reference chain with whole-surplus battery allocation.
    pub fn reference(soc_upper_limit: f64) -> Self {
        Self::new(soc_upper_limit, BatteryPolicy::Reference)
    }

    /// Stages in priority order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// SoC ceiling for battery charging.
    pub fn soc_upper_limit(&self) -> f64 {
        self.soc_upper_limit
    }
}

impl Router for PriorityRouter {
    fn route(
        &self,
        surplus_w: f64,
        battery: &BatteryState,
    ) -> Result<RoutingAllocation, EpsError> {
        let surplus_w = ensure_finite("surplus_w", surplus_w)?;
        let battery_full = battery.state_of_charge >= self.soc_upper_limit;
        let mut allocation = RoutingAllocation::unallocated(surplus_w, battery_full);
        let mut remaining_w = surplus_w;
        for stage in &self.stages {
            let taken_w = stage.allocate(remaining_w, battery);
            allocation.add(stage.sink(), taken_w);
            remaining_w -= taken_w;
        }
        Ok(allocation)
    }
}
