//! Simulation output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::Species;
use crate::simulation::run::{PopulationHistory, RunOutcome};

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub config: SimulationConfig,
    pub outcome: RunOutcome,
    pub history: PopulationHistory,
    pub statistics: SimulationStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks_simulated: u64,
    pub simulation_time_ms: u64,
    pub agents_spawned: u32,
    pub final_grass_mean: f64,
}

impl SimulationOutput {
    pub fn new(
        config: SimulationConfig,
        outcome: RunOutcome,
        history: PopulationHistory,
        agents_spawned: u32,
        elapsed: Duration,
    ) -> Self {
        let final_grass_mean = history.last().map(|s| s.grass_mean).unwrap_or(0.0);

        Self {
            config,
            outcome,
            history,
            statistics: SimulationStats {
                ticks_simulated: outcome.ticks,
                simulation_time_ms: elapsed.as_millis() as u64,
                agents_spawned,
                final_grass_mean,
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let counts = self.outcome.final_counts;
        let mut text = format!(
            "Simulated {} ticks in {}ms ({})\nFinal: {} sheep, {} goats, {} wolves",
            self.statistics.ticks_simulated,
            self.statistics.simulation_time_ms,
            self.outcome.stop_reason,
            counts.sheep,
            counts.goat,
            counts.wolf,
        );
        for species in Species::ALL {
            if let Some((tick, peak)) = self.history.peak(species) {
                text.push_str(&format!("\nPeak {species}: {peak} at tick {tick}"));
            }
        }
        text
    }
}
