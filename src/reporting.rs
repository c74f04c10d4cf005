//! Console report for a scenario run.

use std::fmt::Write;

use crate::runner::ScenarioRun;

/// Renders the budget, optional per-step lines, the run summary, and the
/// analytical-versus-simulated charge time comparison.
pub fn render_report(run: &ScenarioRun, include_steps: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", run.budget);
    if include_steps {
        let _ = writeln!(out, "\n--- Simulation Trace ---");
        for s in &run.trace {
            let _ = writeln!(out, "{s}");
        }
    }
    let _ = writeln!(out, "\n{}", run.summary);
    let _ = write!(out, "{}", charge_time_comparison(run));
    out
}

/// Prints the report to stdout.
pub fn print_report(run: &ScenarioRun, include_steps: bool) {
    println!("{}", render_report(run, include_steps));
}

fn charge_time_comparison(run: &ScenarioRun) -> String {
    match (
        run.budget.analytical_charge_time_h,
        run.summary.time_to_full_h,
    ) {
        (Some(analytical), Some(simulated)) => format!(
            "Charge time check:     analytical {:.2} min, simulated {:.2} min \
             (Δ {:+.2} min, step {:.2} min)",
            analytical * 60.0,
            simulated * 60.0,
            (simulated - analytical) * 60.0,
            run.trace.dt_h * 60.0
        ),
        (Some(analytical), None) => format!(
            "Charge time check:     analytical {:.2} min, not reached within {:.2} min",
            analytical * 60.0,
            run.summary.duration_h * 60.0
        ),
        (None, _) => "Charge time check:     no charging power available".to_string(),
    }
}
