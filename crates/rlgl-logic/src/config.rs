//! Game tunables, loaded from JSON.
//!
//! Every section is `#[serde(default)]`, so a config file only needs the
//! values it overrides. Defaults match the shipped first-person character:
//! 600/1000 walk/sprint speeds, 45°/s turn rates, 55-unit capsules and
//! 3000 u/s projectiles.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for a match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for spawn draws. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub spawn: SpawnConfig,
    pub stamina: StaminaConfig,
    pub movement: MovementConfig,
    pub human: BodyConfig,
    pub computer: BodyConfig,
    pub projectile: ProjectileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    /// Tag that marks an actor as a spawn point.
    pub tag: String,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            tag: "Spawnpoint".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StaminaConfig {
    pub max: f32,
    /// Stamina regained per second while regenerating.
    pub regen_rate: f32,
    /// Seconds between releasing exertion and regeneration starting.
    pub regen_delay: f32,
    /// Stamina spent per second of moving exertion.
    pub depletion_rate: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max: 10.0,
            regen_rate: 2.0,
            regen_delay: 2.0,
            depletion_rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    pub default_walk_speed: f32,
    pub sprint_speed: f32,
    /// Degrees per second at full turn input.
    pub base_turn_rate: f32,
    /// Degrees per second at full look input.
    pub base_look_up_rate: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            default_walk_speed: 600.0,
            sprint_speed: 1000.0,
            base_turn_rate: 45.0,
            base_look_up_rate: 45.0,
        }
    }
}

/// Collision body for a participant class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub radius: f32,
    pub simulating_physics: bool,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            radius: 55.0,
            simulating_physics: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub radius: f32,
    /// Seconds before an unresolved projectile is removed.
    pub lifespan: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 3000.0,
            radius: 5.0,
            lifespan: 3.0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn.tag.trim().is_empty() {
            return Err(ConfigError::Invalid("spawn.tag must not be empty".into()));
        }
        let s = &self.stamina;
        if !(s.max > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "stamina.max must be positive, got {}",
                s.max
            )));
        }
        for (name, value) in [
            ("stamina.regen_rate", s.regen_rate),
            ("stamina.regen_delay", s.regen_delay),
            ("stamina.depletion_rate", s.depletion_rate),
            ("movement.default_walk_speed", self.movement.default_walk_speed),
            ("movement.sprint_speed", self.movement.sprint_speed),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("human.radius", self.human.radius),
            ("computer.radius", self.computer.radius),
            ("projectile.radius", self.projectile.radius),
            ("projectile.speed", self.projectile.speed),
            ("projectile.lifespan", self.projectile.lifespan),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration or level data
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
