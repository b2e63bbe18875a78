//! ECS World - owns the field, the prey grids, the population and the RNG
//!
//! Everything a tick mutates lives here and is shared, in place, by every
//! agent update within that tick.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{AgentId, GridPos, Species, Tick};
use crate::entity::population::{PopulationCounts, PopulationStore};
use crate::simulation::resource_field::ResourceField;
use crate::spatial::occupancy::PreyOccupancy;

/// The simulation world
pub struct World {
    pub current_tick: Tick,
    pub config: SimulationConfig,
    pub field: ResourceField,
    pub occupancy: PreyOccupancy,
    pub population: PopulationStore,
    /// Source of every stochastic choice in the simulation
    pub rng: ChaCha8Rng,
}

impl World {
    /// Build an empty world (no agents) seeded from `config.run.seed`
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(config.run.seed);
        Self::with_rng(config, rng)
    }

    /// Build an empty world around an injected RNG
    pub fn with_rng(config: SimulationConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let field = ResourceField::new(&config.field);
        let occupancy = PreyOccupancy::new(config.field.width, config.field.height);
        let initial: usize = Species::ALL
            .iter()
            .map(|&s| config.profile(s).initial_count)
            .sum();

        Ok(Self {
            current_tick: 0,
            config,
            field,
            occupancy,
            population: PopulationStore::with_capacity(initial),
            rng,
        })
    }

    /// Build a world and place the configured starting populations
    ///
    /// Sheep first, then goats, then wolves; this is also the first tick's
    /// processing order.
    pub fn seeded(config: SimulationConfig) -> Result<Self> {
        let mut world = Self::new(config)?;
        world.populate();
        Ok(world)
    }

    pub fn populate(&mut self) {
        for species in Species::ALL {
            for _ in 0..self.config.profile(species).initial_count {
                self.spawn_random(species);
            }
        }
        tracing::info!(
            sheep = self.population.count(Species::Sheep),
            goat = self.population.count(Species::Goat),
            wolf = self.population.count(Species::Wolf),
            "Populated {}x{} field",
            self.config.field.width,
            self.config.field.height
        );
    }

    /// Spawn at a uniformly random cell with energy drawn from `[0, 2 * gain)`
    pub fn spawn_random(&mut self, species: Species) -> AgentId {
        let pos = self.random_cell();
        let energy = self.newborn_energy(species);
        self.spawn_at(species, pos, energy)
    }

    /// Spawn at an explicit cell (wrapped onto the field) with explicit energy
    pub fn spawn_at(&mut self, species: Species, pos: GridPos, energy: f64) -> AgentId {
        let pos = self.field.wrap(pos);
        self.population
            .insert(species, pos, energy, self.current_tick, &mut self.occupancy)
    }

    /// Remove an agent from the store and its occupancy grid
    pub fn kill(&mut self, id: AgentId) -> Result<()> {
        let agent = self.population.remove(id, &mut self.occupancy)?;
        tracing::trace!(id = %agent.id, species = %agent.species, energy = agent.energy, "died");
        Ok(())
    }

    pub fn random_cell(&mut self) -> GridPos {
        let x = self.rng.gen_range(0..self.config.field.width) as i32;
        let y = self.rng.gen_range(0..self.config.field.height) as i32;
        GridPos::new(x, y)
    }

    pub fn newborn_energy(&mut self, species: Species) -> f64 {
        let gain = self.config.profile(species).gain_from_food;
        if gain > 0.0 {
            self.rng.gen_range(0.0..2.0 * gain)
        } else {
            0.0
        }
    }

    pub fn counts(&self) -> PopulationCounts {
        self.population.counts()
    }

    pub fn entity_count(&self) -> usize {
        self.population.len()
    }

    pub fn resource_field(&self) -> &ResourceField {
        &self.field
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }
}
