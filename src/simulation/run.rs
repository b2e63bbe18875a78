//! Run controller - drives ticks until a stop condition holds
//!
//! Stop conditions are only checked between ticks (and once before the
//! first), never in the middle of one. When several hold at once the first in
//! this order wins: population cap, extinction, tick limit.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::core::config::{RunConfig, SimulationConfig};
use crate::core::types::{Species, Tick};
use crate::ecs::world::World;
use crate::entity::population::PopulationCounts;
use crate::simulation::tick::{run_simulation_tick, TickStats};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "species", rename_all = "snake_case")]
pub enum StopReason {
    /// A species reached its configured head-count cap
    PopulationCap(Species),
    /// `max_ticks` ticks have run
    TickLimit,
    /// No agents of any species are left
    Extinction,
    /// An observer asked to stop
    Observer,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::PopulationCap(species) => write!(f, "{species} population cap reached"),
            StopReason::TickLimit => write!(f, "tick limit reached"),
            StopReason::Extinction => write!(f, "every species died out"),
            StopReason::Observer => write!(f, "stopped by observer"),
        }
    }
}

/// Aggregate state handed to observers after every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: Tick,
    pub counts: PopulationCounts,
    pub stats: TickStats,
    pub grass_mean: f64,
}

impl TickSnapshot {
    fn capture(world: &World, stats: TickStats) -> Self {
        Self {
            tick: world.current_tick,
            counts: world.counts(),
            stats,
            grass_mean: world.field.mean(),
        }
    }
}

/// Receives a snapshot after each tick; returning `Break` ends the run
pub trait TickObserver {
    fn on_tick(&mut self, snapshot: &TickSnapshot, world: &World) -> ControlFlow<()>;
}

impl<F> TickObserver for F
where
    F: FnMut(&TickSnapshot, &World) -> ControlFlow<()>,
{
    fn on_tick(&mut self, snapshot: &TickSnapshot, world: &World) -> ControlFlow<()> {
        self(snapshot, world)
    }
}

/// One point of the population time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationSample {
    pub tick: Tick,
    pub counts: PopulationCounts,
    pub grass_mean: f64,
}

/// Population time series, sampled every `sample_every` ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationHistory {
    pub sample_every: u64,
    pub samples: Vec<PopulationSample>,
}

impl PopulationHistory {
    /// `sample_every` must be positive
    pub fn new(sample_every: u64) -> Self {
        debug_assert!(sample_every > 0, "history sampling interval must be positive");
        Self {
            sample_every,
            samples: Vec::new(),
        }
    }

    /// Record the world as it stands, regardless of the sampling interval
    pub fn record_world(&mut self, world: &World) {
        self.samples.push(PopulationSample {
            tick: world.current_tick,
            counts: world.counts(),
            grass_mean: world.field.mean(),
        });
    }

    /// Largest head count seen for `species`, with the tick it was seen at
    pub fn peak(&self, species: Species) -> Option<(Tick, usize)> {
        self.samples
            .iter()
            .map(|s| (s.tick, s.counts.get(species)))
            .max_by_key(|&(tick, count)| (count, std::cmp::Reverse(tick)))
    }

    pub fn last(&self) -> Option<&PopulationSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl TickObserver for PopulationHistory {
    fn on_tick(&mut self, snapshot: &TickSnapshot, _world: &World) -> ControlFlow<()> {
        if snapshot.tick % self.sample_every == 0 {
            self.samples.push(PopulationSample {
                tick: snapshot.tick,
                counts: snapshot.counts,
                grass_mean: snapshot.grass_mean,
            });
        }
        ControlFlow::Continue(())
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// World tick counter when the run stopped
    pub ticks: Tick,
    pub stop_reason: StopReason,
    pub final_counts: PopulationCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunController {
    max_ticks: Tick,
    caps: Vec<(Species, usize)>,
}

impl RunController {
    pub fn new(run: &RunConfig, caps: impl IntoIterator<Item = (Species, usize)>) -> Self {
        Self {
            max_ticks: run.max_ticks,
            caps: caps.into_iter().collect(),
        }
    }

    /// Tick limit from `run`, caps from every species profile that sets one
    pub fn from_config(config: &SimulationConfig) -> Self {
        let caps = Species::ALL
            .into_iter()
            .filter_map(|s| config.profile(s).cap.map(|cap| (s, cap)));
        Self::new(&config.run, caps)
    }

    pub fn max_ticks(&self) -> Tick {
        self.max_ticks
    }

    pub fn caps(&self) -> &[(Species, usize)] {
        &self.caps
    }

    /// The condition that ends the run at this point, if any
    pub fn check_stop(&self, world: &World) -> Option<StopReason> {
        let counts = world.counts();
        if let Some(&(species, _)) = self
            .caps
            .iter()
            .find(|&&(species, cap)| counts.get(species) >= cap)
        {
            return Some(StopReason::PopulationCap(species));
        }
        if counts.total() == 0 {
            return Some(StopReason::Extinction);
        }
        if world.current_tick >= self.max_ticks {
            return Some(StopReason::TickLimit);
        }
        None
    }

    /// Advance exactly one tick, ignoring stop conditions
    pub fn step(&self, world: &mut World) -> TickSnapshot {
        let stats = run_simulation_tick(world);
        TickSnapshot::capture(world, stats)
    }

    /// Tick until a stop condition holds or the observer breaks
    pub fn run<O>(&self, world: &mut World, observer: &mut O) -> RunOutcome
    where
        O: TickObserver + ?Sized,
    {
        let started_at = world.current_tick;
        let stop_reason = loop {
            if let Some(reason) = self.check_stop(world) {
                break reason;
            }
            let snapshot = self.step(world);
            if observer.on_tick(&snapshot, world).is_break() {
                break StopReason::Observer;
            }
        };

        let outcome = RunOutcome {
            ticks: world.current_tick,
            stop_reason,
            final_counts: world.counts(),
        };
        tracing::info!(
            tick = outcome.ticks,
            ran = outcome.ticks - started_at,
            sheep = outcome.final_counts.sheep,
            goat = outcome.final_counts.goat,
            wolf = outcome.final_counts.wolf,
            "Run stopped: {}",
            outcome.stop_reason
        );
        outcome
    }

    /// `run` without an observer
    pub fn run_to_end(&self, world: &mut World) -> RunOutcome {
        self.run(world, &mut |_: &TickSnapshot, _: &World| ControlFlow::Continue(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridPos;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.field.width = 24;
        config.field.height = 24;
        config.sheep.initial_count = 5;
        config.goat.initial_count = 5;
        config.wolf.initial_count = 2;
        config.run.max_ticks = 10;
        config
    }

    #[test]
    fn test_from_config_collects_caps() {
        let config = SimulationConfig::default();
        let controller = RunController::from_config(&config);
        assert_eq!(
            controller.caps(),
            &[(Species::Sheep, 6000), (Species::Goat, 6000)]
        );
        assert_eq!(controller.max_ticks(), 3000);
    }

    #[test]
    fn test_stops_at_tick_limit() {
        let mut config = small_config();
        // Keep everyone alive so only the tick limit can stop the run
        for species in Species::ALL {
            config.profile_mut(species).metabolic_cost = 0.0;
            config.profile_mut(species).reproduce_chance = 0.0;
        }
        config.wolf.initial_count = 0;
        let mut world = World::seeded(config.clone()).unwrap();

        let outcome = RunController::from_config(&config).run_to_end(&mut world);
        assert_eq!(outcome.stop_reason, StopReason::TickLimit);
        assert_eq!(outcome.ticks, 10);
        assert_eq!(world.current_tick, 10);
    }

    #[test]
    fn test_cap_checked_before_first_tick() {
        let mut config = small_config();
        config.sheep.cap = Some(5);
        let mut world = World::seeded(config.clone()).unwrap();

        let outcome = RunController::from_config(&config).run_to_end(&mut world);
        assert_eq!(outcome.stop_reason, StopReason::PopulationCap(Species::Sheep));
        assert_eq!(outcome.ticks, 0);
    }

    #[test]
    fn test_empty_world_is_extinct() {
        let config = small_config();
        let mut world = World::new(config.clone()).unwrap();
        let outcome = RunController::from_config(&config).run_to_end(&mut world);
        assert_eq!(outcome.stop_reason, StopReason::Extinction);
        assert_eq!(outcome.final_counts.total(), 0);
    }

    #[test]
    fn test_cap_outranks_tick_limit() {
        let config = small_config();
        let world = World::seeded(config.clone()).unwrap();
        let run = RunConfig {
            max_ticks: 0,
            ..config.run.clone()
        };
        let controller = RunController::new(&run, [(Species::Goat, 1)]);
        assert_eq!(
            controller.check_stop(&world),
            Some(StopReason::PopulationCap(Species::Goat))
        );
        let uncapped = RunController::new(&run, Vec::new());
        assert_eq!(uncapped.check_stop(&world), Some(StopReason::TickLimit));
    }

    #[test]
    fn test_observer_can_stop_run() {
        let config = small_config();
        let mut world = World::seeded(config.clone()).unwrap();
        let mut seen = Vec::new();
        let mut observer = |snapshot: &TickSnapshot, _: &World| {
            seen.push(snapshot.tick);
            if snapshot.tick == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        let outcome = RunController::from_config(&config).run(&mut world, &mut observer);
        assert_eq!(outcome.stop_reason, StopReason::Observer);
        assert_eq!(outcome.ticks, 3);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_history_samples_on_interval() {
        let mut config = small_config();
        config.run.max_ticks = 9;
        for species in Species::ALL {
            config.profile_mut(species).metabolic_cost = 0.0;
        }
        let mut world = World::seeded(config.clone()).unwrap();
        let mut history = PopulationHistory::new(3);
        history.record_world(&world);
        RunController::from_config(&config).run(&mut world, &mut history);

        let ticks: Vec<Tick> = history.samples.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![0, 3, 6, 9]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "sampling interval must be positive")]
    fn test_history_rejects_zero_interval() {
        let _ = PopulationHistory::new(0);
    }

    #[test]
    fn test_history_peak_prefers_earliest() {
        let mut history = PopulationHistory::new(1);
        let mut world = World::new(small_config()).unwrap();
        history.record_world(&world);
        world.spawn_at(Species::Wolf, GridPos::new(0, 0), 1.0);
        world.tick();
        history.record_world(&world);
        world.tick();
        history.record_world(&world);

        assert_eq!(history.peak(Species::Wolf), Some((1, 1)));
        assert_eq!(history.peak(Species::Sheep), Some((0, 0)));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_step_ignores_stop_conditions() {
        let config = small_config();
        let mut world = World::new(config.clone()).unwrap();
        let controller = RunController::from_config(&config);
        assert_eq!(controller.check_stop(&world), Some(StopReason::Extinction));
        let snapshot = controller.step(&mut world);
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.stats.processed, 0);
    }
}
