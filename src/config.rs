//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::power::BusLoad;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the reference power budget. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Regulated power rails and their load currents.
    #[serde(default = "default_buses")]
    pub buses: Vec<BusConfig>,
    /// EPS limit, degradation, and solar generation.
    #[serde(default)]
    pub power: PowerConfig,
    /// Battery pack parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Timestep, duration, and routing policy.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// One regulated power rail.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BusConfig {
    /// Rail label.
    #[serde(default)]
    pub name: String,
    /// Rail voltage (V).
    pub voltage_v: f64,
    /// Load current (A).
    pub current_a: f64,
}

impl BusConfig {
    fn new(name: &str, voltage_v: f64, current_a: f64) -> Self {
        Self {
            name: name.to_string(),
            voltage_v,
            current_a,
        }
    }
}

fn default_buses() -> Vec<BusConfig> {
    vec![
        BusConfig::new("28V", 28.0, 1.2),
        BusConfig::new("12V", 12.0, 0.8),
        BusConfig::new("5V", 5.0, 2.5),
        BusConfig::new("3V3", 3.3, 1.5),
    ]
}

/// EPS capacity, EOL degradation, and solar array parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerConfig {
    /// EOL degradation factor α (dimensionless, >= 0).
    pub degradation_alpha: f64,
    /// Maximum continuous EPS output power (W).
    pub eps_max_w: f64,
    /// Solar array generation (W).
    pub solar_w: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            degradation_alpha: 0.25,
            eps_max_w: 150.0,
            solar_w: 180.0,
        }
    }
}

/// Battery pack parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (Wh).
    pub capacity_wh: f64,
    /// Initial state of charge (0.0–1.0).
    pub initial_soc: f64,
    /// Charging efficiency η (0.0–1.0).
    pub eta_charge: f64,
    /// SoC at which charging is curtailed (0.0 exclusive – 1.0 inclusive).
    pub soc_upper_limit: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_wh: 100.0,
            initial_soc: 0.70,
            eta_charge: 0.90,
            soc_upper_limit: 1.0,
        }
    }
}

/// Simulation timing and routing policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Fixed timestep (h).
    pub dt_h: f64,
    /// Simulated window (h).
    pub duration_h: f64,
    /// Battery routing policy: `"reference"` or `"headroom_capped"`.
    pub routing: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt_h: 1.0 / 60.0,
            duration_h: 0.5,
            routing: "reference".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_wh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Routing policy names accepted by `simulation.routing`.
pub const ROUTING_POLICIES: &[&str] = &["reference", "headroom_capped"];

impl ScenarioConfig {
    /// Returns the reference scenario from the avionics power budget analysis.
    pub fn baseline() -> Self {
        Self {
            buses: default_buses(),
            power: PowerConfig::default(),
            battery: BatteryConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }

    /// Returns the eclipse preset: no solar generation, so the surplus is negative.
    pub fn eclipse() -> Self {
        Self {
            power: PowerConfig {
                solar_w: 0.0,
                ..PowerConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the EOL-overload preset: heavier rails that exceed the EPS
    /// limit once degraded, leaving a thin solar surplus.
    pub fn eol_overload() -> Self {
        Self {
            buses: vec![
                BusConfig::new("28V", 28.0, 3.0),
                BusConfig::new("12V", 12.0, 2.0),
                BusConfig::new("5V", 5.0, 4.0),
                BusConfig::new("3V3", 3.3, 3.0),
            ],
            simulation: SimulationConfig {
                duration_h: 2.0,
                ..SimulationConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the cell-health preset: charging stops at 95 % SoC and the
    /// battery allocation never over-fills within a step.
    pub fn cell_health() -> Self {
        Self {
            battery: BatteryConfig {
                soc_upper_limit: 0.95,
                ..BatteryConfig::default()
            },
            simulation: SimulationConfig {
                routing: "headroom_capped".to_string(),
                ..SimulationConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["reference", "eclipse", "eol_overload", "cell_health"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "reference" => Ok(Self::baseline()),
            "eclipse" => Ok(Self::eclipse()),
            "eol_overload" => Ok(Self::eol_overload()),
            "cell_health" => Ok(Self::cell_health()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Bus loads in configuration order.
    pub fn bus_loads(&self) -> Vec<BusLoad> {
        self.buses
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let name = if b.name.is_empty() {
                    format!("bus{}", i + 1)
                } else {
                    b.name.clone()
                };
                BusLoad::new(name, b.voltage_v, b.current_a)
            })
            .collect()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.buses.is_empty() {
            errors.push(ConfigError::new("buses", "at least one bus is required"));
        }
        for (i, b) in self.buses.iter().enumerate() {
            check_non_negative(&mut errors, &format!("buses[{i}].voltage_v"), b.voltage_v);
            check_non_negative(&mut errors, &format!("buses[{i}].current_a"), b.current_a);
        }

        let p = &self.power;
        check_non_negative(&mut errors, "power.degradation_alpha", p.degradation_alpha);
        check_non_negative(&mut errors, "power.eps_max_w", p.eps_max_w);
        check_non_negative(&mut errors, "power.solar_w", p.solar_w);

        let bat = &self.battery;
        if !bat.capacity_wh.is_finite() || bat.capacity_wh <= 0.0 {
            errors.push(ConfigError::new("battery.capacity_wh", "must be finite and > 0"));
        }
        check_unit_interval(&mut errors, "battery.initial_soc", bat.initial_soc);
        check_unit_interval(&mut errors, "battery.eta_charge", bat.eta_charge);
        if !(bat.soc_upper_limit > 0.0 && bat.soc_upper_limit <= 1.0) {
            errors.push(ConfigError::new(
                "battery.soc_upper_limit",
                "must be in (0.0, 1.0]",
            ));
        }

        let s = &self.simulation;
        let dt_ok = s.dt_h.is_finite() && s.dt_h > 0.0;
        let duration_ok = s.duration_h.is_finite() && s.duration_h > 0.0;
        if !dt_ok {
            errors.push(ConfigError::new("simulation.dt_h", "must be finite and > 0"));
        }
        if !duration_ok {
            errors.push(ConfigError::new(
                "simulation.duration_h",
                "must be finite and > 0",
            ));
        }
        if dt_ok && duration_ok && s.dt_h > s.duration_h {
            errors.push(ConfigError::new(
                "simulation.dt_h",
                "must be <= simulation.duration_h",
            ));
        }
        if !ROUTING_POLICIES.contains(&s.routing.as_str()) {
            errors.push(ConfigError::new(
                "simulation.routing",
                format!(
                    "must be one of {}, got \"{}\"",
                    ROUTING_POLICIES.join(", "),
                    s.routing
                ),
            ));
        }

        errors
    }
}

fn check_non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError::new(field, "must be finite and >= 0"));
    }
}

fn check_unit_interval(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
    }
}

impl fmt::Display for ScenarioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} buses | α={:.2} EPS={:.1} W solar={:.1} W | \
             battery {:.1} Wh SoC0={:.0}% η={:.0}% limit={:.0}% | \
             dt={:.2} min T={:.1} min ({})",
            self.buses.len(),
            self.power.degradation_alpha,
            self.power.eps_max_w,
            self.power.solar_w,
            self.battery.capacity_wh,
            self.battery.initial_soc * 100.0,
            self.battery.eta_charge * 100.0,
            self.battery.soc_upper_limit * 100.0,
            self.simulation.dt_h * 60.0,
            self.simulation.duration_h * 60.0,
            self.simulation.routing,
        )
    }
}
