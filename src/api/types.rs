//! API response and query types.
//!
//! Trace field names match the CSV export columns.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::power::PowerBudget;
use crate::sim::{TraceSample, TraceSummary};

/// Budget snapshot plus compliance verdicts.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    #[serde(flatten)]
    pub budget: PowerBudget,
    pub nominal_compliant: bool,
    pub eol_compliant: bool,
}

impl From<&PowerBudget> for BudgetResponse {
    fn from(b: &PowerBudget) -> Self {
        Self {
            budget: b.clone(),
            nominal_compliant: b.nominal_compliant(),
            eol_compliant: b.eol_compliant(),
        }
    }
}

/// Scenario, run summary, and the most recent sample.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub scenario: ScenarioConfig,
    pub summary: TraceSummary,
    /// `None` when the run recorded no steps.
    pub latest_step: Option<TraceRecord>,
}

/// One trace sample, flattened to the CSV column names.
#[derive(Debug, Serialize)]
pub struct TraceRecord {
    pub timestep: usize,
    pub time_h: f64,
    pub energy_wh: f64,
    pub soc: f64,
    pub surplus_w: f64,
    pub battery_w: f64,
    pub payload_w: f64,
    pub supercap_w: f64,
    pub shunt_w: f64,
    pub charge_w: f64,
    pub battery_full: bool,
}

impl From<&TraceSample> for TraceRecord {
    fn from(s: &TraceSample) -> Self {
        Self {
            timestep: s.timestep,
            time_h: s.time_h,
            energy_wh: s.battery.energy_wh,
            soc: s.battery.state_of_charge,
            surplus_w: s.allocation.surplus_w,
            battery_w: s.allocation.battery_w,
            payload_w: s.allocation.payload_w,
            supercap_w: s.allocation.supercapacitor_w,
            shunt_w: s.allocation.shunt_w,
            charge_w: s.charge_w,
            battery_full: s.allocation.battery_full,
        }
    }
}

/// Optional range query parameters for the trace endpoint.
#[derive(Debug, Deserialize)]
pub struct TraceQuery {
    /// Start timestep (inclusive).
    pub from: Option<usize>,
    /// End timestep (inclusive).
    pub to: Option<usize>,
}

/// Error body for 400-class responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BatteryState, RoutingAllocation};

    #[test]
    fn trace_record_uses_csv_names() {
        let sample = TraceSample {
            timestep: 5,
            time_h: 0.1,
            battery: BatteryState::new(90.0, 100.0),
            allocation: RoutingAllocation {
                surplus_w: 104.1875,
                battery_w: 100.0,
                payload_w: 0.0,
                supercapacitor_w: 0.0,
                shunt_w: 4.1875,
                battery_full: false,
            },
            charge_w: 90.0,
        };
        let record = TraceRecord::from(&sample);
        assert_eq!(record.timestep, 5);
        assert_eq!(record.energy_wh, 90.0);
        assert_eq!(record.soc, 0.9);
        assert_eq!(record.supercap_w, 0.0);
        assert_eq!(record.shunt_w, 4.1875);
        assert_eq!(record.charge_w, 90.0);
        assert!(!record.battery_full);
    }
}
