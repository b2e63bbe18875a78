//! Reproduction system
//!
//! A parent that passes the (optional) energy gate rolls against its species'
//! reproduce chance. On success its energy is divided by the split divisor and
//! a newborn appears at a random cell with energy from `[0, 2 * gain)`.

use rand::Rng;

use crate::core::config::SpeciesProfile;
use crate::core::types::{AgentId, Species};
use crate::ecs::world::World;

/// Try to spawn one offspring; returns the newborn's id on success
pub fn try_reproduce(
    world: &mut World,
    parent: AgentId,
    species: Species,
    profile: &SpeciesProfile,
) -> Option<AgentId> {
    let energy = world.population.get(parent).ok()?.energy;
    if let Some(threshold) = profile.reproduce_threshold {
        if energy <= threshold {
            return None;
        }
    }

    let roll: f64 = world.rng.gen();
    if roll >= profile.reproduce_chance {
        return None;
    }

    world.population.get_mut(parent).ok()?.energy = energy / profile.energy_split;
    Some(world.spawn_random(species))
}
