pub mod foraging;
pub mod output;
pub mod predation;
pub mod reproduction;
pub mod resource_field;
pub mod run;
pub mod tick;

pub use output::SimulationOutput;
pub use resource_field::ResourceField;
pub use run::{
    PopulationHistory, PopulationSample, RunController, RunOutcome, StopReason, TickObserver,
    TickSnapshot,
};
pub use tick::{run_simulation_tick, TickStats};
