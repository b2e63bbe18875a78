pub mod agent;
pub mod population;

pub use agent::{Agent, Role};
pub use population::{PopulationCounts, PopulationStore};
