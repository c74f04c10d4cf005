//! eps-sim entry point: CLI wiring, logging, and output.

use std::process;

use tracing::{error, info};

use eps_sim::cli::{CliOptions, parse_args, print_usage};
use eps_sim::config::ScenarioConfig;
use eps_sim::io::export::export_csv;
use eps_sim::logging::init_tracing;
use eps_sim::reporting::print_report;
use eps_sim::run_scenario;

fn load_scenario(cli: &CliOptions) -> Result<ScenarioConfig, eps_sim::EpsError> {
    let cfg = match (&cli.scenario, &cli.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
        (None, Some(name)) => ScenarioConfig::from_preset(name)?,
        (None, None) => ScenarioConfig::baseline(),
    };
    Ok(cfg)
}

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(2);
        }
    };
    if cli.help {
        print_usage();
        return;
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        if cli.scenario.is_some() {
            eprintln!("error: --tui runs built-in presets only; use --preset");
            process::exit(2);
        }
        let preset = cli.preset.as_deref().unwrap_or("reference");
        if let Err(e) = eps_sim::tui::run(preset) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        return;
    }

    init_tracing(cli.verbose, cli.quiet);

    let scenario = match load_scenario(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let run = match run_scenario(&scenario) {
        Ok(run) => run,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    print_report(&run, !cli.quiet);

    if let Some(path) = cli.trace_out.as_deref() {
        if let Err(e) = export_csv(&run.trace, path) {
            error!("failed to write trace CSV: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), rows = run.trace.len(), "trace written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(eps_sim::api::AppState::from(run));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("failed to create tokio runtime: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = rt.block_on(eps_sim::api::serve(state, addr)) {
            error!("API server failed: {e}");
            process::exit(1);
        }
    }
}
