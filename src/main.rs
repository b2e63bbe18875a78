//! Pasture - Entry Point
//!
//! Builds a configuration from a TOML file or a named preset, applies command
//! line overrides, runs the simulation to a stop condition and prints a
//! progress table followed by a summary.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use pasture::core::config::SimulationConfig;
use pasture::core::error::Result;
use pasture::ecs::world::World;
use pasture::simulation::output::SimulationOutput;
use pasture::simulation::run::{PopulationHistory, RunController, TickObserver, TickSnapshot};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// Wolves eat one of each prey species in range every tick
    Default,
    /// Wolves pick sheep or goats on a coin flip and breed after each meal
    Classic,
}

/// Pasture - sheep, goats and wolves on a toroidal grass field
#[derive(Parser, Debug)]
#[command(name = "pasture")]
#[command(about = "Run a seeded predator-prey grazing simulation")]
struct Args {
    /// TOML config file; missing keys take their default values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in rule set used when no config file is given
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the tick limit
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Print a progress row every N ticks (0 disables)
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Write the full run output as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pasture=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => match args.preset {
            Preset::Default => SimulationConfig::default(),
            Preset::Classic => SimulationConfig::classic(),
        },
    };
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.run.max_ticks = max_ticks;
    }
    config.validate()?;

    println!("=== PASTURE ===");
    println!(
        "Field: {}x{}  seed: {}  max ticks: {}",
        config.field.width, config.field.height, config.run.seed, config.run.max_ticks
    );
    println!();

    let mut world = World::seeded(config.clone())?;
    let controller = RunController::from_config(&config);
    let mut history = PopulationHistory::new(config.run.sample_every);
    history.record_world(&world);

    if args.report_every > 0 {
        println!(
            "{:>7} | {:>7} | {:>7} | {:>7} | {:>7}",
            "tick", "sheep", "goats", "wolves", "grass"
        );
        println!("--------|---------|---------|---------|--------");
    }
    let report_every = args.report_every;
    let mut observer = |snapshot: &TickSnapshot, world: &World| {
        if report_every > 0 && snapshot.tick % report_every == 0 {
            println!(
                "{:>7} | {:>7} | {:>7} | {:>7} | {:>7.1}",
                snapshot.tick,
                snapshot.counts.sheep,
                snapshot.counts.goat,
                snapshot.counts.wolf,
                snapshot.grass_mean
            );
        }
        history.on_tick(snapshot, world)
    };

    let start = Instant::now();
    let outcome = controller.run(&mut world, &mut observer);
    let elapsed = start.elapsed();

    let output = SimulationOutput::new(
        config,
        outcome,
        history,
        world.population.total_spawned(),
        elapsed,
    );

    println!();
    println!("{}", output.summary());

    if let Some(path) = &args.output {
        std::fs::write(path, output.to_json())?;
        println!("\nFull output written to {}", path.display());
    }

    Ok(())
}
