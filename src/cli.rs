use std::env;
use std::path::PathBuf;

use crate::config::ScenarioConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub trace_out: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub help: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
    #[cfg(feature = "tui")]
    pub tui: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            scenario: None,
            preset: None,
            trace_out: None,
            quiet: false,
            verbose: false,
            help: false,
            #[cfg(feature = "api")]
            serve: false,
            #[cfg(feature = "api")]
            port: 3000,
            #[cfg(feature = "tui")]
            tui: false,
        }
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    parse_args_from(env::args().skip(1))
}

/// Parses arguments that follow the program name.
///
/// With neither `--scenario` nor `--preset`, the reference preset is used.
///
/// # Errors
///
/// Returns a message for unknown flags, missing or malformed values,
/// repeated flags, and conflicting sources.
pub fn parse_args_from<I, S>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if opts.scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--trace-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --trace-out (expected a file path)")?;
                if opts.trace_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--trace-out provided more than once".to_string());
                }
            }
            "--quiet" | "-q" => opts.quiet = true,
            "--verbose" | "-v" => opts.verbose = true,
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                opts.port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            #[cfg(feature = "tui")]
            "--tui" => opts.tui = true,
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.scenario.is_none() && opts.preset.is_none() {
        opts.preset = Some("reference".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("eps-sim: satellite EPS power budget and battery charging simulator");
    eprintln!();
    eprintln!("Usage: eps-sim [--scenario <path> | --preset <name>] [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>    Load scenario from a TOML file");
    eprintln!(
        "  --preset <name>      Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --trace-out <path>   Export the simulation trace to CSV");
    eprintln!("  -q, --quiet          Skip per-step output; log warnings only");
    eprintln!("  -v, --verbose        Log every step (debug level)");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve              Serve results over HTTP after the run");
        eprintln!("  --port <u16>         HTTP port (default: 3000)");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                Open the interactive terminal dashboard");
    eprintln!("  -h, --help           Show this help message");
    eprintln!();
    eprintln!("RUST_LOG overrides the log filter.");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;
    use std::path::Path;

    #[test]
    fn supports_scenario_cli() {
        let opts =
            parse_args_from(["--scenario", "mission.toml"]).expect("parse should succeed");
        assert_eq!(opts.scenario.as_deref(), Some(Path::new("mission.toml")));
        assert!(opts.preset.is_none());
    }

    #[test]
    fn defaults_to_reference_preset() {
        let opts = parse_args_from(Vec::<String>::new()).expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("reference"));
    }

    #[test]
    fn flags_and_trace_out() {
        let opts = parse_args_from(["--preset", "eclipse", "--trace-out", "t.csv", "-q", "-v"])
            .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("eclipse"));
        assert_eq!(opts.trace_out.as_deref(), Some(Path::new("t.csv")));
        assert!(opts.quiet);
        assert!(opts.verbose);
    }

    #[test]
    fn help_short_circuits() {
        let opts = parse_args_from(["--help", "--bogus"]).expect("parse should succeed");
        assert!(opts.help);
    }

    #[test]
    fn rejects_conflicts_and_unknowns() {
        assert!(parse_args_from(["--scenario", "a.toml", "--preset", "reference"]).is_err());
        assert!(parse_args_from(["--preset", "a", "--preset", "b"]).is_err());
        assert!(parse_args_from(["--trace-out"]).is_err());
        assert!(parse_args_from(["--frobnicate"]).is_err());
    }
}
