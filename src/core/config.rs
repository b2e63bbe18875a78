//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Defaults reproduce the classic
//! two-grazer pasture: a 600x300 field, sheep and goats at 300 head each,
//! 100 wolves.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ConfigError, Result};
use crate::core::types::Species;

/// Longest field side accepted; keeps every coordinate plus step well inside `i32`
pub const MAX_DIMENSION: u32 = 1 << 20;

/// Complete configuration for one run
///
/// Species sections are read as overrides on top of that species' defaults,
/// so a partial `[wolf]` table keeps the wolf values for every key it omits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct SimulationConfig {
    pub field: FieldConfig,
    pub sheep: SpeciesProfile,
    pub goat: SpeciesProfile,
    pub wolf: SpeciesProfile,
    pub predation: PredationConfig,
    pub run: RunConfig,
}

/// Grass field geometry and growth dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    // === GEOMETRY ===
    /// Number of cells along x (the torus wraps at this width)
    pub width: u32,

    /// Number of cells along y
    pub height: u32,

    // === GROWTH ===
    /// Grass value every cell starts with ("full growth")
    pub initial_growth: f32,

    /// Upper bound for any cell; regrowth never pushes a cell above this
    pub max_growth: f32,

    /// Added to every cell once per tick, before any agent acts
    pub regrowth_rate: f32,

    // === GRAZING IMPACT ===
    /// Subtracted from each of the 9 cells around a grazer that ate
    ///
    /// The center cell is part of the 3x3 block and takes this hit too.
    pub trample: f32,

    /// Multiplier on the amount eaten, subtracted from the center cell only
    ///
    /// At 8x, a sheep eating 10 strips 80 extra units from its own cell on top
    /// of the trample, so a full cell (255) is grazed flat in ~3 meals.
    pub center_depletion: f32,

    // === PARALLELIZATION ===
    /// Minimum cell count before the regrowth pass runs on rayon
    ///
    /// Below this, thread overhead exceeds the benefit.
    pub parallel_threshold: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 300,
            initial_growth: 255.0,
            max_growth: 255.0,
            regrowth_rate: 1.0,
            trample: 15.0,
            center_depletion: 8.0,
            parallel_threshold: 65_536,
        }
    }
}

/// Per-species life-history constants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesProfile {
    /// Head count placed at random cells before the first tick
    pub initial_count: usize,

    /// For grazers: the most grass one meal can take.
    /// For predators: energy gained per prey eaten.
    /// For everyone: newborns draw energy uniformly from `[0, 2 * gain_from_food)`.
    pub gain_from_food: f64,

    /// Chance per reproduction roll of spawning one offspring
    pub reproduce_chance: f64,

    /// When set, the reproduction roll only happens above this energy
    pub reproduce_threshold: Option<f64>,

    /// Parent energy is divided by this when it gives birth (2 = halve)
    pub energy_split: f64,

    /// Movement bound: each axis moves by a uniform integer in `[-step, step]`
    pub step: u32,

    /// Energy burned every tick
    pub metabolic_cost: f64,

    /// Agents whose energy drops strictly below this die
    pub death_threshold: f64,

    /// Run stops once this many are alive at once (None = not tracked)
    pub cap: Option<usize>,
}

impl SpeciesProfile {
    fn grazer(gain_from_food: f64) -> Self {
        Self {
            initial_count: 300,
            gain_from_food,
            reproduce_chance: 0.03,
            reproduce_threshold: None,
            energy_split: 2.0,
            step: 3,
            metabolic_cost: 1.0,
            death_threshold: 0.0,
            cap: Some(6000),
        }
    }

    fn predator() -> Self {
        Self {
            initial_count: 100,
            gain_from_food: 20.0,
            reproduce_chance: 0.2,
            reproduce_threshold: None,
            energy_split: 2.0,
            step: 3,
            metabolic_cost: 1.0,
            death_threshold: 0.0,
            cap: None,
        }
    }

    fn validate(&self, species: Species) -> std::result::Result<(), ConfigError> {
        let name = species.name();
        non_negative(format!("{name}.gain_from_food"), self.gain_from_food)?;
        non_negative(format!("{name}.metabolic_cost"), self.metabolic_cost)?;
        if !self.death_threshold.is_finite() {
            return Err(ConfigError::NegativeConstant {
                name: format!("{name}.death_threshold"),
                value: self.death_threshold,
            });
        }
        probability(format!("{name}.reproduce_chance"), self.reproduce_chance)?;
        if let Some(threshold) = self.reproduce_threshold {
            non_negative(format!("{name}.reproduce_threshold"), threshold)?;
        }
        if !(self.energy_split.is_finite() && self.energy_split >= 1.0) {
            return Err(ConfigError::InvalidEnergySplit {
                name: name.to_string(),
                value: self.energy_split,
            });
        }
        Ok(())
    }
}

/// A species section as written in a config file; absent keys keep the default
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProfileOverrides {
    initial_count: Option<usize>,
    gain_from_food: Option<f64>,
    reproduce_chance: Option<f64>,
    #[serde(deserialize_with = "explicit")]
    reproduce_threshold: Option<Option<f64>>,
    energy_split: Option<f64>,
    step: Option<u32>,
    metabolic_cost: Option<f64>,
    death_threshold: Option<f64>,
    #[serde(deserialize_with = "explicit")]
    cap: Option<Option<usize>>,
}

impl ProfileOverrides {
    fn apply(self, base: SpeciesProfile) -> SpeciesProfile {
        SpeciesProfile {
            initial_count: self.initial_count.unwrap_or(base.initial_count),
            gain_from_food: self.gain_from_food.unwrap_or(base.gain_from_food),
            reproduce_chance: self.reproduce_chance.unwrap_or(base.reproduce_chance),
            reproduce_threshold: self
                .reproduce_threshold
                .unwrap_or(base.reproduce_threshold),
            energy_split: self.energy_split.unwrap_or(base.energy_split),
            step: self.step.unwrap_or(base.step),
            metabolic_cost: self.metabolic_cost.unwrap_or(base.metabolic_cost),
            death_threshold: self.death_threshold.unwrap_or(base.death_threshold),
            cap: self.cap.unwrap_or(base.cap),
        }
    }
}

/// A present key (even an explicit null) overrides; an absent one does not
fn explicit<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// How a predator chooses among the prey species it found
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredationPolicy {
    /// Eat one of each prey species present in range (one if only one species is present)
    Gorge,
    /// Roll once: below `sheep_bias` go for sheep, otherwise goats.
    /// If the chosen species has nobody in range the predator goes hungry.
    CoinFlip { sheep_bias: f64 },
}

/// Predator-only hunting rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredationConfig {
    /// Half-width of the square hunting window `[x-r, x+r) x [y-r, y+r)`
    pub radius: u32,

    pub policy: PredationPolicy,

    /// Roll for reproduction once per meal instead of once per tick
    pub breed_after_meal: bool,
}

impl Default for PredationConfig {
    fn default() -> Self {
        Self {
            radius: 6,
            policy: PredationPolicy::Gorge,
            breed_after_meal: false,
        }
    }
}

/// Run controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seed for the single simulation RNG
    pub seed: u64,

    /// Hard stop after this many ticks
    pub max_ticks: u64,

    /// History keeps one population sample every this many ticks
    pub sample_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            max_ticks: 3000,
            sample_every: 1,
        }
    }
}

/// On-disk shape of [`SimulationConfig`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    field: FieldConfig,
    sheep: ProfileOverrides,
    goat: ProfileOverrides,
    wolf: ProfileOverrides,
    predation: PredationConfig,
    run: RunConfig,
}

impl From<ConfigFile> for SimulationConfig {
    fn from(file: ConfigFile) -> Self {
        let defaults = SimulationConfig::default();
        Self {
            field: file.field,
            sheep: file.sheep.apply(defaults.sheep),
            goat: file.goat.apply(defaults.goat),
            wolf: file.wolf.apply(defaults.wolf),
            predation: file.predation,
            run: file.run,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            sheep: SpeciesProfile::grazer(10.0),
            goat: SpeciesProfile::grazer(11.0),
            wolf: SpeciesProfile::predator(),
            predation: PredationConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The classic pasture rules: wolves pick sheep or goats on a fair coin
    /// and only breed right after a meal
    pub fn classic() -> Self {
        Self {
            predation: PredationConfig {
                radius: 6,
                policy: PredationPolicy::CoinFlip { sheep_bias: 0.5 },
                breed_after_meal: true,
            },
            ..Self::default()
        }
    }

    pub fn profile(&self, species: Species) -> &SpeciesProfile {
        match species {
            Species::Sheep => &self.sheep,
            Species::Goat => &self.goat,
            Species::Wolf => &self.wolf,
        }
    }

    pub fn profile_mut(&mut self, species: Species) -> &mut SpeciesProfile {
        match species {
            Species::Sheep => &mut self.sheep,
            Species::Goat => &mut self.goat,
            Species::Wolf => &mut self.wolf,
        }
    }

    /// Parse and validate a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let field = &self.field;
        if field.width == 0 {
            return Err(ConfigError::NonPositiveDimension {
                name: "field.width",
                value: field.width,
            });
        }
        if field.height == 0 {
            return Err(ConfigError::NonPositiveDimension {
                name: "field.height",
                value: field.height,
            });
        }
        for (name, value) in [("field.width", field.width), ("field.height", field.height)] {
            if value > MAX_DIMENSION {
                return Err(ConfigError::DimensionTooLarge {
                    name,
                    value,
                    max: MAX_DIMENSION,
                });
            }
        }
        non_negative("field.initial_growth".into(), field.initial_growth as f64)?;
        non_negative("field.max_growth".into(), field.max_growth as f64)?;
        non_negative("field.regrowth_rate".into(), field.regrowth_rate as f64)?;
        non_negative("field.trample".into(), field.trample as f64)?;
        non_negative("field.center_depletion".into(), field.center_depletion as f64)?;
        if field.initial_growth > field.max_growth {
            return Err(ConfigError::InitialGrowthAboveCap {
                initial: field.initial_growth,
                cap: field.max_growth,
            });
        }

        // A step past the longer side only wraps around again
        let max_step = field.width.max(field.height);
        for species in Species::ALL {
            let profile = self.profile(species);
            profile.validate(species)?;
            if profile.step > max_step {
                return Err(ConfigError::StepTooLarge {
                    name: species.name().to_string(),
                    step: profile.step,
                    max: max_step,
                });
            }
        }

        let radius = self.predation.radius;
        if radius == 0 || radius > field.width / 2 || radius > field.height / 2 {
            return Err(ConfigError::InvalidPredationRadius {
                radius,
                width: field.width,
                height: field.height,
            });
        }
        if let PredationPolicy::CoinFlip { sheep_bias } = self.predation.policy {
            probability("predation.policy.sheep_bias".into(), sheep_bias)?;
        }

        if self.run.max_ticks == 0 {
            return Err(ConfigError::ZeroRunParameter { name: "run.max_ticks" });
        }
        if self.run.sample_every == 0 {
            return Err(ConfigError::ZeroRunParameter { name: "run.sample_every" });
        }

        Ok(())
    }
}

fn non_negative(name: String, value: f64) -> std::result::Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeConstant { name, value })
    }
}

fn probability(name: String, value: f64) -> std::result::Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}
