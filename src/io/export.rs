//! CSV export for simulation traces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::EpsError;
use crate::sim::types::SimulationTrace;

/// Column header for CSV trace export.
pub const HEADER: &str = "timestep,time_h,energy_wh,soc,surplus_w,battery_w,\
                          payload_w,supercap_w,shunt_w,charge_w,battery_full";

/// Exports a trace to a CSV file at the given path.
///
/// Writes a header row, the initial condition, then one row per step.
/// Produces identical bytes for identical traces.
///
/// # Arguments
///
/// * `trace` - Complete simulation trace
/// * `path` - Output file path
///
/// # Errors
///
/// Returns [`EpsError::Io`] if the file cannot be created and
/// [`EpsError::Csv`] if writing fails.
pub fn export_csv(trace: &SimulationTrace, path: &Path) -> Result<(), EpsError> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(trace, buf)
}

/// Writes a trace as CSV to any writer.
///
/// The first data row is the battery state at `time_h = 0`. No routing
/// has happened yet, so its `timestep` and power columns are empty.
///
/// # Errors
///
/// Returns [`EpsError::Csv`] if a record cannot be written, or
/// [`EpsError::Io`] if the final flush fails.
pub fn write_csv(trace: &SimulationTrace, writer: impl Write) -> Result<(), EpsError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let init = &trace.initial;
    let mut initial_row = vec![
        String::new(),
        format!("{:.6}", 0.0),
        format!("{:.6}", init.energy_wh),
        format!("{:.6}", init.state_of_charge),
    ];
    initial_row.resize(HEADER.split(',').count(), String::new());
    wtr.write_record(&initial_row)?;

    for s in trace {
        let a = &s.allocation;
        wtr.write_record(&[
            s.timestep.to_string(),
            format!("{:.6}", s.time_h),
            format!("{:.6}", s.battery.energy_wh),
            format!("{:.6}", s.battery.state_of_charge),
            format!("{:.4}", a.surplus_w),
            format!("{:.4}", a.battery_w),
            format!("{:.4}", a.payload_w),
            format!("{:.4}", a.supercapacitor_w),
            format!("{:.4}", a.shunt_w),
            format!("{:.4}", s.charge_w),
            a.battery_full.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
