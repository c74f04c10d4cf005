//! File output for simulation traces.

pub mod export;
