//! Time-stepped battery simulation: integration, routing, and tracing.

pub mod battery;
pub mod clock;
pub mod engine;
/// Priority routing of surplus power.
pub mod router;
pub mod summary;
pub mod types;

pub use battery::{BatteryIntegrator, BatteryState};
pub use engine::Engine;
pub use router::{PriorityRouter, Router, RoutingAllocation};
pub use summary::TraceSummary;
pub use types::{SimConfig, SimulationTrace, TraceSample};
