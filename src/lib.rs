//! Satellite electrical power subsystem (EPS) budget and battery charging
//! simulator.
//!
//! Computes the static power budget from regulated bus loads, then steps a
//! battery through time while a priority router splits the solar surplus
//! between the battery and downstream sinks.

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
/// Static power budget.
pub mod power;
pub mod reporting;
pub mod runner;
/// Battery integration, routing, and trace recording.
pub mod sim;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "tui")]
pub mod tui;

pub use error::EpsError;
pub use runner::{ScenarioRun, run_scenario};
