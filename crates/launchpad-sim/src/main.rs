use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use launchpad_core::LaunchpadConfig;
use launchpad_sim::{Runner, Scenario};

#[derive(Parser, Debug)]
#[command(name = "launchpad-sim")]
#[command(about = "Replay launchpad scenarios against an in-memory registry")]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long)]
    scenario: PathBuf,

    /// TOML registry configuration, overriding the scenario's own
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop at the first step that does not go as scripted
    #[arg(long)]
    fail_fast: bool,

    /// Print every published event as a JSON line
    #[arg(long)]
    events: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("failed to load scenario {}", args.scenario.display()))?;
    let config = args
        .config
        .as_ref()
        .map(|path| {
            LaunchpadConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))
        })
        .transpose()?;

    info!(scenario = %scenario.name, steps = scenario.steps.len(), "starting scenario");

    let mut runner = Runner::new(&scenario, config, args.fail_fast)
        .with_context(|| format!("failed to initialize scenario '{}'", scenario.name))?;
    let report = runner
        .run(&scenario.steps)
        .with_context(|| format!("scenario '{}' aborted", scenario.name))?;

    if args.events {
        for record in runner.events() {
            println!("{}", serde_json::to_string(record)?);
        }
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_clean() {
        for failure in &report.failures {
            warn!(index = failure.index, action = failure.action, "{}", failure.error);
        }
        bail!("{} step(s) did not go as scripted", report.failures.len());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
