//! Match configuration
//!
//! A `MatchConfig` is read once (usually from TOML) and consumed to build a
//! [`Game`](crate::entity::Game). Nothing in the simulator reads config
//! from global state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, Result};

/// Per-match settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Discrete ticks a player authors per turn
    pub ticks_per_turn: u32,

    /// Real-time seconds one turn represents
    ///
    /// Divided evenly across `ticks_per_turn`; every per-second rate in the
    /// simulator is scaled by the resulting tick length.
    pub seconds_per_turn: f32,

    /// World width (units)
    pub width: f32,

    /// World height (units)
    pub height: f32,

    /// Resources every player holds in the first snapshot
    pub starting_resources: f32,

    /// Chess-clock budget per player (seconds)
    pub time_control: f32,

    /// Chess-clock increment per turn (seconds)
    pub time_increment: f32,

    pub asteroids: AsteroidFieldConfig,
}

/// Seeded asteroid field layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidFieldConfig {
    pub count: u32,
    pub min_size: f32,
    pub max_size: f32,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            ticks_per_turn: 20,
            seconds_per_turn: 10.0,
            width: 100.0,
            height: 100.0,
            starting_resources: 100.0,
            time_control: 15.0,
            time_increment: 10.0,
            asteroids: AsteroidFieldConfig::default(),
        }
    }
}

impl Default for AsteroidFieldConfig {
    fn default() -> Self {
        Self {
            count: 0,
            min_size: 1.0,
            max_size: 5.0,
            seed: 12345,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn seconds_per_tick(&self) -> f32 {
        self.seconds_per_turn / self.ticks_per_turn as f32
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.ticks_per_turn == 0 {
            return Err(ConfigError::NoTicksPerTurn);
        }

        if self.seconds_per_turn <= 0.0 || !self.seconds_per_turn.is_finite() {
            return Err(ConfigError::NonPositiveTurnLength(self.seconds_per_turn));
        }

        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(ConfigError::DegenerateWorld {
                width: self.width,
                height: self.height,
            });
        }

        let field = &self.asteroids;
        let sizes_finite = field.min_size.is_finite() && field.max_size.is_finite();
        if !sizes_finite || field.min_size < 0.0 || field.min_size > field.max_size {
            return Err(ConfigError::InvalidAsteroidSizes {
                min: field.min_size,
                max: field.max_size,
            });
        }

        Ok(())
    }
}
