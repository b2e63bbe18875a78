//! Tick system - orchestrates simulation updates
//!
//! This is the core loop that ties together:
//! regrowth -> (per agent) move -> metabolize -> death check -> feed -> reproduce
//!
//! Each tick advances the simulation one step. The grass field regrows in a
//! separate pass first, then every agent alive at the start of the tick is
//! updated exactly once, in roster (insertion) order, against the live shared
//! grids. Newborns join the roster but wait for the next tick.
//!
//! Ordering matters and is deliberate: a wolf earlier in the roster can eat
//! prey a later wolf would have found, and one grazer's meal thins the grass
//! for its neighbours processed after it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{FieldConfig, PredationConfig, SpeciesProfile};
use crate::core::error::{PastureError, Result};
use crate::core::types::{AgentId, GridPos, Species, Tick};
use crate::ecs::world::World;
use crate::entity::agent::Role;
use crate::entity::population::PopulationCounts;
use crate::simulation::foraging::forage;
use crate::simulation::predation::{eat, scan_for_prey, select_targets};
use crate::simulation::reproduction::try_reproduce;

/// What happened during one tick, per species
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickStats {
    /// Index of the tick that just completed (1-based)
    pub tick: Tick,
    pub births: PopulationCounts,
    pub starved: PopulationCounts,
    pub eaten: PopulationCounts,
    /// Agents updated this tick
    pub processed: usize,
}

/// Run a single simulation tick
///
/// 1. Regrow grass everywhere
/// 2. Update every agent on the roster taken at tick start
/// 3. Compact the roster and advance the tick counter
pub fn run_simulation_tick(world: &mut World) -> TickStats {
    let mut stats = TickStats::default();

    world.field.regrow();

    // One clone per tick keeps the rule constants readable while the world is
    // borrowed mutably by each agent update.
    let config = world.config.clone();
    let roster = world.population.roster();

    for id in roster {
        let Ok(species) = world.population.get(id).map(|a| a.species) else {
            // Eaten earlier this tick
            continue;
        };
        stats.processed += 1;

        let outcome = match Role::of(species, &config) {
            Role::Grazer(profile) => {
                tick_grazer(world, id, species, profile, &config.field, &mut stats)
            }
            Role::Predator { profile, hunting } => {
                tick_predator(world, id, species, profile, hunting, &mut stats)
            }
        };
        if let Err(e) = outcome {
            tracing::debug!(%id, %species, "agent update aborted: {e}");
        }
    }

    world.population.compact();
    world.tick();
    stats.tick = world.current_tick;

    tracing::debug!(
        tick = world.current_tick,
        sheep = world.population.count(Species::Sheep),
        goat = world.population.count(Species::Goat),
        wolf = world.population.count(Species::Wolf),
        births = stats.births.total(),
        starved = stats.starved.total(),
        eaten = stats.eaten.total(),
        "tick complete"
    );

    stats
}

/// Displace an agent by a uniform integer in `[-step, step]` on each axis
fn wander(world: &mut World, id: AgentId, step: u32) -> Result<GridPos> {
    let step = step as i32;
    let dx = world.rng.gen_range(-step..=step);
    let dy = world.rng.gen_range(-step..=step);
    let from = world.population.get(id)?.pos;
    let to = world.field.wrap(from.offset(dx, dy));
    world.population.relocate(id, to, &mut world.occupancy)?;
    Ok(to)
}

/// Burn the metabolic cost; returns true if the agent died of it
fn metabolize(
    world: &mut World,
    id: AgentId,
    profile: &SpeciesProfile,
    species: Species,
    stats: &mut TickStats,
) -> Result<bool> {
    let agent = world.population.get_mut(id)?;
    agent.energy -= profile.metabolic_cost;
    if agent.energy < profile.death_threshold {
        world.kill(id)?;
        stats.starved.record(species);
        return Ok(true);
    }
    Ok(false)
}

fn tick_grazer(
    world: &mut World,
    id: AgentId,
    species: Species,
    profile: &SpeciesProfile,
    field: &FieldConfig,
    stats: &mut TickStats,
) -> Result<()> {
    let pos = wander(world, id, profile.step)?;
    if metabolize(world, id, profile, species, stats)? {
        return Ok(());
    }

    let eaten = forage(&mut world.field, pos, profile.gain_from_food, field);
    if eaten > 0.0 {
        world.population.get_mut(id)?.energy += eaten;
    }

    if try_reproduce(world, id, species, profile).is_some() {
        stats.births.record(species);
    }
    Ok(())
}

fn tick_predator(
    world: &mut World,
    id: AgentId,
    species: Species,
    profile: &SpeciesProfile,
    hunting: &PredationConfig,
    stats: &mut TickStats,
) -> Result<()> {
    let pos = wander(world, id, profile.step)?;
    if metabolize(world, id, profile, species, stats)? {
        return Ok(());
    }

    let found = scan_for_prey(world, pos, hunting.radius);
    if found.is_empty() {
        // Nothing in range: the predator's turn ends here
        return Ok(());
    }
    let targets = select_targets(world, &found, hunting.policy);

    for (prey_species, prey) in targets {
        match eat(world, id, prey, profile.gain_from_food) {
            Ok(()) => {
                stats.eaten.record(prey_species);
                if hunting.breed_after_meal
                    && try_reproduce(world, id, species, profile).is_some()
                {
                    stats.births.record(species);
                }
            }
            Err(PastureError::AgentNotFound(stale)) => {
                tracing::trace!(predator = %id, prey = %stale, "prey already gone");
            }
            Err(e) => return Err(e),
        }
    }

    if !hunting.breed_after_meal && try_reproduce(world, id, species, profile).is_some() {
        stats.births.record(species);
    }
    Ok(())
}
