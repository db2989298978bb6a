use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use fieldwave::config::DemoConfig;
use fieldwave::demo::{ParticleFieldDemo, PendulumWaveDemo};
use fieldwave::error::RunError;
use fieldwave::spawn::Spawner;
use fieldwave::window;

const DEFAULT_LOG_FILTER: &str = "fieldwave=info";
const LOCAL_CONFIG: &str = "fieldwave.toml";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DemoKind {
    /// Bouncing particles under a swaying camera.
    Particles,
    /// A row of pendulums drifting in and out of phase.
    Pendulums,
}

/// Real-time particle field and pendulum wave visualizations.
#[derive(Parser, Debug)]
#[command(name = "fieldwave", version, about)]
struct Args {
    /// Which demo to run.
    #[arg(value_enum)]
    demo: DemoKind,

    /// TOML config file. Defaults to ./fieldwave.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `fieldwave=debug`. Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    /// Seed for particle spawning, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging(directive: Option<&str>) {
    let filter = match directive {
        Some(d) => EnvFilter::try_new(d).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig, RunError> {
    if let Some(path) = path {
        return Ok(DemoConfig::load(path)?);
    }

    let local = Path::new(LOCAL_CONFIG);
    if !local.exists() {
        return Ok(DemoConfig::default());
    }
    match DemoConfig::load(local) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!("ignoring {LOCAL_CONFIG}, using defaults: {e}");
            Ok(DemoConfig::default())
        }
    }
}

fn run(args: &Args) -> Result<(), RunError> {
    let config = load_config(args.config.as_deref())?;

    match args.demo {
        DemoKind::Particles => {
            let spawner = match args.seed {
                Some(seed) => {
                    tracing::info!(seed, "seeded particle spawner");
                    Spawner::from_seed(seed)
                }
                None => Spawner::from_clock(),
            };
            let demo = ParticleFieldDemo::new(
                config.field,
                config.window.width,
                config.window.height,
                spawner,
            );
            window::run(demo, &config.window)
        }
        DemoKind::Pendulums => window::run(PendulumWaveDemo::new(config.pendulum), &config.window),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    tracing::info!("fieldwave v{} starting ({:?})", env!("CARGO_PKG_VERSION"), args.demo);

    match run(&args) {
        Ok(()) => {
            tracing::info!("shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Display messages already embed their sources.
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
