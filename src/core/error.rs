use thiserror::Error;

use crate::core::types::AgentId;

#[derive(Error, Debug)]
pub enum PastureError {
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Startup validation failures; configuration is rejected, never clamped
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid dimension `{name}` must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: u32 },

    #[error("grid dimension `{name}` is {value}, above the supported {max}")]
    DimensionTooLarge {
        name: &'static str,
        value: u32,
        max: u32,
    },

    #[error("`{name}.step` of {step} exceeds the longest field side ({max})")]
    StepTooLarge { name: String, step: u32, max: u32 },

    #[error("`{name}` must be a finite non-negative number, got {value}")]
    NegativeConstant { name: String, value: f64 },

    #[error("`{name}` must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: String, value: f64 },

    #[error("`{name}` energy split divisor must be >= 1, got {value}")]
    InvalidEnergySplit { name: String, value: f64 },

    #[error("initial growth ({initial}) exceeds the growth cap ({cap})")]
    InitialGrowthAboveCap { initial: f32, cap: f32 },

    #[error("predation radius {radius} must be positive and 2r must fit inside {width}x{height}")]
    InvalidPredationRadius { radius: u32, width: u32, height: u32 },

    #[error("`{name}` must be positive")]
    ZeroRunParameter { name: &'static str },
}

pub type Result<T> = std::result::Result<T, PastureError>;
