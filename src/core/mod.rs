pub mod config;
pub mod error;
pub mod types;

pub use config::{PredationConfig, PredationPolicy, SimulationConfig, SpeciesProfile};
pub use error::{ConfigError, PastureError, Result};
pub use types::{AgentId, GridPos, Species, Tick};
