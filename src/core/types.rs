//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for agents
///
/// Assigned monotonically by the population store and never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation tick counter (simulation time unit)
pub type Tick = u64;

/// Species enumeration
///
/// Two grazers share the grass field; wolves hunt both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Sheep,
    Goat,
    Wolf,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Sheep, Species::Goat, Species::Wolf];

    /// Species that are indexed spatially and can be eaten
    pub const PREY: [Species; 2] = [Species::Sheep, Species::Goat];

    pub fn is_prey(&self) -> bool {
        matches!(self, Species::Sheep | Species::Goat)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Sheep => "sheep",
            Species::Goat => "goat",
            Species::Wolf => "wolf",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer cell coordinate on the torus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_ordering() {
        assert!(AgentId(1) < AgentId(2));
        assert_eq!(AgentId(7), AgentId(7));
        assert_eq!(AgentId(7).to_string(), "#7");
    }

    #[test]
    fn test_species_prey_flags() {
        assert!(Species::Sheep.is_prey());
        assert!(Species::Goat.is_prey());
        assert!(!Species::Wolf.is_prey());
        assert!(Species::PREY.iter().all(|s| s.is_prey()));
    }

    #[test]
    fn test_species_serde_names() {
        let json = serde_json::to_string(&Species::Goat).unwrap();
        assert_eq!(json, "\"goat\"");
        let back: Species = serde_json::from_str("\"wolf\"").unwrap();
        assert_eq!(back, Species::Wolf);
    }

    #[test]
    fn test_grid_pos_offset() {
        let p = GridPos::new(3, 4).offset(-5, 2);
        assert_eq!(p, GridPos::new(-2, 6));
    }
}
