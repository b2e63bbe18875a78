use std::time::{Duration, Instant};

use pasture::core::config::SimulationConfig;
use pasture::core::types::Species;
use pasture::ecs::world::World;
use pasture::simulation::foraging::forage;
use pasture::simulation::predation::scan_for_prey;
use pasture::simulation::tick::run_simulation_tick;

const SAMPLES: u32 = 100;

fn main() {
    let mut config = SimulationConfig::default();
    // Profile at scale without the caps ending the run early
    config.sheep.initial_count = 20_000;
    config.goat.initial_count = 20_000;
    config.wolf.initial_count = 2_000;
    config.sheep.cap = None;
    config.goat.cap = None;

    let mut world = match World::seeded(config) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("invalid profiling config: {e}");
            return;
        }
    };
    println!(
        "Profiling tick phases with {} agents on a {}x{} field\n",
        world.entity_count(),
        world.field.width(),
        world.field.height()
    );

    // Warm up
    for _ in 0..5 {
        run_simulation_tick(&mut world);
    }

    let mut times = TickTimes::default();
    for _ in 0..SAMPLES {
        profile_tick(&mut world, &mut times);
    }

    println!("=== Average times per tick ({SAMPLES} samples) ===\n");
    println!("Phase           | Time       | % of total");
    println!("----------------|------------|------------");
    println!("Regrowth        | {:>8.2?} | {:>5.1}%", times.regrow / SAMPLES, pct(times.regrow, times.total));
    println!("Foraging        | {:>8.2?} | {:>5.1}%", times.forage / SAMPLES, pct(times.forage, times.total));
    println!("Prey scans      | {:>8.2?} | {:>5.1}%", times.scan / SAMPLES, pct(times.scan, times.total));
    println!("----------------|------------|------------");
    println!("Full tick       | {:>8.2?} | 100.0%", times.total / SAMPLES);
    println!(
        "\nFinal counts: {} sheep, {} goats, {} wolves",
        world.population.count(Species::Sheep),
        world.population.count(Species::Goat),
        world.population.count(Species::Wolf)
    );
}

fn pct(part: Duration, total: Duration) -> f64 {
    (part.as_nanos() as f64 / total.as_nanos().max(1) as f64) * 100.0
}

#[derive(Default)]
struct TickTimes {
    regrow: Duration,
    forage: Duration,
    scan: Duration,
    total: Duration,
}

/// Time each phase in isolation on scratch copies, then the real tick
fn profile_tick(world: &mut World, times: &mut TickTimes) {
    let mut field = world.field.clone();
    let start = Instant::now();
    field.regrow();
    times.regrow += start.elapsed();

    let config = world.config.clone();
    let grazers: Vec<_> = world
        .population
        .iter()
        .filter(|a| a.species.is_prey())
        .map(|a| (a.pos, config.profile(a.species).gain_from_food))
        .collect();
    let start = Instant::now();
    for (pos, gain) in grazers {
        forage(&mut field, pos, gain, &config.field);
    }
    times.forage += start.elapsed();

    let wolves: Vec<_> = world
        .population
        .iter_species(Species::Wolf)
        .map(|a| a.pos)
        .collect();
    let start = Instant::now();
    for pos in wolves {
        std::hint::black_box(scan_for_prey(world, pos, config.predation.radius));
    }
    times.scan += start.elapsed();

    let start = Instant::now();
    run_simulation_tick(world);
    times.total += start.elapsed();
}
