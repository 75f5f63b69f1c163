//! Locale Engine
//!
//! Builds a seeded scenario, flushes the root queue every few ticks and
//! writes frame snapshots for external viewers.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use locale_core::config::{EngineConfig, DEFAULT_CONFIG_PATH};
use locale_core::output::{capture, SnapshotWriter};
use locale_core::setup::build_scenario;
use locale_core::MutationLog;

/// Command line arguments for the engine
#[derive(Parser, Debug)]
#[command(name = "locale_sim")]
#[command(about = "Hierarchical polarity simulation")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Random seed for reproducibility (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate (overrides config)
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of physical bodies (overrides config)
    #[arg(long)]
    bodies: Option<usize>,

    /// JSONL file for frame snapshots (overrides config)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = if args.config.exists() {
        EngineConfig::from_file(&args.config)?
    } else {
        tracing::info!(path = %args.config.display(), "no config file, using defaults");
        EngineConfig::default()
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    if let Some(bodies) = args.bodies {
        config.simulation.bodies = bodies;
    }
    if let Some(output) = &args.output {
        config.output.snapshot_path = Some(output.clone());
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    let sim = &config.simulation;

    tracing::info!(
        seed = sim.seed,
        ticks = sim.ticks,
        bodies = sim.bodies,
        fields = sim.fields,
        "starting locale engine"
    );

    let (mut tree, summary) = build_scenario(&config)?;
    if let Some(path) = &config.output.mutation_log_path {
        tree.set_log_sink(Box::new(MutationLog::new(path)?));
    }
    let root = tree.root();

    let mut writer = match &config.output.snapshot_path {
        Some(path) => Some(SnapshotWriter::new(path)?),
        None => None,
    };
    let snapshot_interval = config.output.snapshot_interval.max(1);
    let flush_interval = sim.flush_interval.max(1);

    let mut passes = 0;
    let mut notices = 0;
    for tick in 0..sim.ticks {
        if tick % flush_interval == 0 {
            tree.update_locale_information(root, root)?;
        }
        passes += tree.update(root);

        let drained = tree.take_notices();
        notices += drained.len();
        for notice in &drained {
            tracing::trace!(
                changed = %notice.changed,
                time = notice.time,
                observers = notice.observers.len(),
                "change notice"
            );
        }

        if let Some(writer) = writer.as_mut() {
            if tick % snapshot_interval == 0 {
                let sequence = writer.frame_count();
                writer.write(&capture(&tree, root, tick, sequence))?;
            }
        }

        if tick > 0 && tick % 100 == 0 {
            tracing::info!(tick, total = sim.ticks, "progress");
        }
    }

    if let Some(writer) = writer.as_mut() {
        let sequence = writer.frame_count();
        writer.write(&capture(&tree, root, sim.ticks, sequence))?;
        writer.flush()?;
        tracing::info!(frames = writer.frame_count(), "wrote snapshots");
    }

    tracing::info!(
        ticks = sim.ticks,
        passes,
        notices,
        bodies = summary.bodies.len(),
        "simulation complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
