//! Population store - sole owner of every live agent
//!
//! Agents live in a hash map keyed by id. A separate roster keeps insertion
//! order so a tick can walk the population in a stable, reproducible order.
//! The roster may briefly hold ids of agents removed during the current tick;
//! `compact` drops them once the tick is over.
//!
//! Every insert and remove keeps the per-species counters and the prey
//! occupancy grids in step with the map.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{PastureError, Result};
use crate::core::types::{AgentId, GridPos, Species, Tick};
use crate::entity::agent::Agent;
use crate::spatial::occupancy::PreyOccupancy;

/// Live head count per species
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub sheep: usize,
    pub goat: usize,
    pub wolf: usize,
}

impl PopulationCounts {
    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Sheep => self.sheep,
            Species::Goat => self.goat,
            Species::Wolf => self.wolf,
        }
    }

    /// Count one more of `species`
    pub fn record(&mut self, species: Species) {
        *self.get_mut(species) += 1;
    }

    fn get_mut(&mut self, species: Species) -> &mut usize {
        match species {
            Species::Sheep => &mut self.sheep,
            Species::Goat => &mut self.goat,
            Species::Wolf => &mut self.wolf,
        }
    }

    pub fn total(&self) -> usize {
        self.sheep + self.goat + self.wolf
    }
}

#[derive(Debug, Default)]
pub struct PopulationStore {
    agents: AHashMap<AgentId, Agent>,
    roster: Vec<AgentId>,
    counts: PopulationCounts,
    next_id: u32,
}

impl PopulationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            agents: AHashMap::with_capacity(capacity),
            roster: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Add a new agent and index it at its starting cell
    ///
    /// `pos` must already be wrapped onto the field.
    pub fn insert(
        &mut self,
        species: Species,
        pos: GridPos,
        energy: f64,
        birth_tick: Tick,
        occupancy: &mut PreyOccupancy,
    ) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;

        self.agents.insert(
            id,
            Agent {
                id,
                species,
                pos,
                energy,
                birth_tick,
            },
        );
        self.roster.push(id);
        self.counts.record(species);
        occupancy.place(species, pos, id);

        id
    }

    /// Remove an agent, clearing its occupancy slot
    ///
    /// Fails with `AgentNotFound` if the agent was already removed.
    pub fn remove(&mut self, id: AgentId, occupancy: &mut PreyOccupancy) -> Result<Agent> {
        let agent = self
            .agents
            .remove(&id)
            .ok_or(PastureError::AgentNotFound(id))?;
        *self.counts.get_mut(agent.species) -= 1;
        occupancy.clear(agent.species, agent.pos);
        Ok(agent)
    }

    /// Move an agent: clear the old slot, then index the new (wrapped) cell
    pub fn relocate(
        &mut self,
        id: AgentId,
        to: GridPos,
        occupancy: &mut PreyOccupancy,
    ) -> Result<GridPos> {
        let agent = self
            .agents
            .get_mut(&id)
            .ok_or(PastureError::AgentNotFound(id))?;
        let from = agent.pos;
        occupancy.clear(agent.species, from);
        agent.pos = to;
        occupancy.place(agent.species, to, id);
        Ok(from)
    }

    pub fn get(&self, id: AgentId) -> Result<&Agent> {
        self.agents.get(&id).ok_or(PastureError::AgentNotFound(id))
    }

    pub fn get_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        self.agents
            .get_mut(&id)
            .ok_or(PastureError::AgentNotFound(id))
    }

    pub fn is_alive(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    /// Copy of the processing order as it stands right now
    ///
    /// Agents inserted after this call are not part of the returned list.
    pub fn roster(&self) -> Vec<AgentId> {
        self.roster.clone()
    }

    /// Drop ids of removed agents from the roster
    pub fn compact(&mut self) {
        let agents = &self.agents;
        self.roster.retain(|id| agents.contains_key(id));
    }

    /// Live agents in roster order
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.roster.iter().filter_map(|id| self.agents.get(id))
    }

    pub fn iter_species(&self, species: Species) -> impl Iterator<Item = &Agent> + '_ {
        self.iter().filter(move |a| a.species == species)
    }

    pub fn counts(&self) -> PopulationCounts {
        self.counts
    }

    pub fn count(&self, species: Species) -> usize {
        self.counts.get(species)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Ids handed out so far (births included)
    pub fn total_spawned(&self) -> u32 {
        self.next_id
    }
}
