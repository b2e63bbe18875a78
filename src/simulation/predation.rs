//! Predation system
//!
//! A predator scans every prey occupancy grid over its hunting window, then
//! picks targets according to the configured [`PredationPolicy`]. Targets are
//! looked up again when eaten; an id that no longer resolves to a live agent is
//! skipped, never treated as a failure of the tick.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::PredationPolicy;
use crate::core::error::Result;
use crate::core::types::{AgentId, GridPos, Species};
use crate::ecs::world::World;

/// Prey ids found in range, per prey species
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreyInRange {
    pub sheep: Vec<AgentId>,
    pub goat: Vec<AgentId>,
}

impl PreyInRange {
    pub fn is_empty(&self) -> bool {
        self.sheep.is_empty() && self.goat.is_empty()
    }

    pub fn of(&self, species: Species) -> &[AgentId] {
        match species {
            Species::Sheep => &self.sheep,
            Species::Goat => &self.goat,
            Species::Wolf => &[],
        }
    }
}

/// Query every prey grid around `center`
pub fn scan_for_prey(world: &World, center: GridPos, radius: u32) -> PreyInRange {
    PreyInRange {
        sheep: world.occupancy.query_radius(Species::Sheep, center, radius),
        goat: world.occupancy.query_radius(Species::Goat, center, radius),
    }
}

/// Decide which prey to go after, uniformly at random within each chosen species
///
/// `Gorge` takes one of each species present. `CoinFlip` commits to a single
/// species up front and comes away empty if none of that species is in range.
pub fn select_targets(
    world: &mut World,
    found: &PreyInRange,
    policy: PredationPolicy,
) -> Vec<(Species, AgentId)> {
    let chosen: Vec<Species> = match policy {
        PredationPolicy::Gorge => Species::PREY.to_vec(),
        PredationPolicy::CoinFlip { sheep_bias } => {
            let roll: f64 = world.rng.gen();
            if roll < sheep_bias {
                vec![Species::Sheep]
            } else {
                vec![Species::Goat]
            }
        }
    };

    chosen
        .into_iter()
        .filter_map(|species| {
            found
                .of(species)
                .choose(&mut world.rng)
                .map(|&id| (species, id))
        })
        .collect()
}

/// Remove `prey` and feed the predator; errors if the prey is already gone
pub fn eat(world: &mut World, predator: AgentId, prey: AgentId, gain: f64) -> Result<()> {
    world.kill(prey)?;
    world.population.get_mut(predator)?.energy += gain;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::error::PastureError;

    fn world() -> World {
        let mut config = SimulationConfig::default();
        config.field.width = 30;
        config.field.height = 30;
        World::new(config).unwrap()
    }

    #[test]
    fn test_scan_finds_prey_in_window_only() {
        let mut world = world();
        let near = world.spawn_at(Species::Sheep, GridPos::new(12, 12), 5.0);
        world.spawn_at(Species::Sheep, GridPos::new(20, 20), 5.0);
        let goat = world.spawn_at(Species::Goat, GridPos::new(5, 9), 5.0);

        let found = scan_for_prey(&world, GridPos::new(10, 10), 6);
        assert_eq!(found.sheep, vec![near]);
        assert_eq!(found.goat, vec![goat]);
    }

    #[test]
    fn test_gorge_takes_one_of_each() {
        let mut world = world();
        let found = PreyInRange {
            sheep: vec![AgentId(1), AgentId(2)],
            goat: vec![AgentId(3)],
        };
        let targets = select_targets(&mut world, &found, PredationPolicy::Gorge);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0, Species::Sheep);
        assert!(found.sheep.contains(&targets[0].1));
        assert_eq!(targets[1], (Species::Goat, AgentId(3)));
    }

    #[test]
    fn test_gorge_with_single_species() {
        let mut world = world();
        let found = PreyInRange {
            sheep: vec![],
            goat: vec![AgentId(3)],
        };
        let targets = select_targets(&mut world, &found, PredationPolicy::Gorge);
        assert_eq!(targets, vec![(Species::Goat, AgentId(3))]);
    }

    #[test]
    fn test_coin_flip_bias_extremes() {
        let mut world = world();
        let found = PreyInRange {
            sheep: vec![AgentId(1)],
            goat: vec![AgentId(2)],
        };
        for _ in 0..20 {
            let always_sheep = PredationPolicy::CoinFlip { sheep_bias: 1.0 };
            assert_eq!(
                select_targets(&mut world, &found, always_sheep),
                vec![(Species::Sheep, AgentId(1))]
            );
            let always_goat = PredationPolicy::CoinFlip { sheep_bias: 0.0 };
            assert_eq!(
                select_targets(&mut world, &found, always_goat),
                vec![(Species::Goat, AgentId(2))]
            );
        }
    }

    #[test]
    fn test_coin_flip_on_absent_species_goes_hungry() {
        let mut world = world();
        let found = PreyInRange {
            sheep: vec![],
            goat: vec![AgentId(2)],
        };
        let policy = PredationPolicy::CoinFlip { sheep_bias: 1.0 };
        assert!(select_targets(&mut world, &found, policy).is_empty());
    }

    #[test]
    fn test_eat_transfers_energy_and_removes_prey() {
        let mut world = world();
        let wolf = world.spawn_at(Species::Wolf, GridPos::new(1, 1), 10.0);
        let sheep = world.spawn_at(Species::Sheep, GridPos::new(2, 2), 5.0);
        eat(&mut world, wolf, sheep, 20.0).unwrap();
        assert_eq!(world.population.get(wolf).unwrap().energy, 30.0);
        assert_eq!(world.counts().sheep, 0);
    }

    #[test]
    fn test_eating_stale_prey_is_not_found() {
        let mut world = world();
        let wolf = world.spawn_at(Species::Wolf, GridPos::new(1, 1), 10.0);
        let sheep = world.spawn_at(Species::Sheep, GridPos::new(2, 2), 5.0);
        world.kill(sheep).unwrap();

        let err = eat(&mut world, wolf, sheep, 20.0).unwrap_err();
        assert!(matches!(err, PastureError::AgentNotFound(_)));
        assert_eq!(world.population.get(wolf).unwrap().energy, 10.0);
    }
}
