//! Agents and the rule set each species plays by

use serde::{Deserialize, Serialize};

use crate::core::config::{PredationConfig, SimulationConfig, SpeciesProfile};
use crate::core::types::{AgentId, GridPos, Species, Tick};

/// A single animal on the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub species: Species,
    /// Always wrapped into the field
    pub pos: GridPos,
    /// May dip below the death threshold for the moment between metabolism
    /// and the death check
    pub energy: f64,
    pub birth_tick: Tick,
}

/// The rule set an agent follows, with the constants for its species
#[derive(Debug, Clone, Copy)]
pub enum Role<'a> {
    Grazer(&'a SpeciesProfile),
    Predator {
        profile: &'a SpeciesProfile,
        hunting: &'a PredationConfig,
    },
}

impl<'a> Role<'a> {
    pub fn of(species: Species, config: &'a SimulationConfig) -> Self {
        match species {
            Species::Sheep => Role::Grazer(&config.sheep),
            Species::Goat => Role::Grazer(&config.goat),
            Species::Wolf => Role::Predator {
                profile: &config.wolf,
                hunting: &config.predation,
            },
        }
    }

    pub fn profile(&self) -> &'a SpeciesProfile {
        match *self {
            Role::Grazer(profile) => profile,
            Role::Predator { profile, .. } => profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_dispatch_by_species() {
        let config = SimulationConfig::default();
        assert!(matches!(Role::of(Species::Sheep, &config), Role::Grazer(_)));
        assert!(matches!(Role::of(Species::Goat, &config), Role::Grazer(_)));
        assert!(matches!(
            Role::of(Species::Wolf, &config),
            Role::Predator { .. }
        ));
    }

    #[test]
    fn test_role_carries_species_constants() {
        let config = SimulationConfig::default();
        assert_eq!(Role::of(Species::Sheep, &config).profile().gain_from_food, 10.0);
        assert_eq!(Role::of(Species::Goat, &config).profile().gain_from_food, 11.0);
        match Role::of(Species::Wolf, &config) {
            Role::Predator { profile, hunting } => {
                assert_eq!(profile.gain_from_food, 20.0);
                assert_eq!(hunting.radius, 6);
            }
            Role::Grazer(_) => panic!("wolves hunt"),
        }
    }
}
