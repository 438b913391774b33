use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating simulation config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Per-agent steering and goal-completion constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTuning {
    /// Radius around the goal that counts as "in goal".
    pub goal_dist: f32,
    /// Dwell seconds inside the radius needed to finish.
    pub goal_time: f32,
    /// Lower bound of the per-agent speed draw.
    pub min_speed: f32,
    /// Width of the speed draw: speed is uniform in `[min_speed, min_speed + speed_range]`.
    pub speed_range: f32,
    /// Global multiplier from speed to steering force.
    pub force_scale: f32,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            goal_dist: 5.0,
            goal_time: 3.0,
            min_speed: 5.0,
            speed_range: 1.5,
            force_scale: 15.0,
        }
    }
}

/// Spawning and population limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Nominal point new agents appear around.
    pub spawn_anchor: Vec3,
    /// Where every agent steers to.
    pub goal: Vec3,
    /// Seconds between spawns while below the ceiling.
    pub spawn_interval: f32,
    /// Population ceiling, base agent included.
    pub max_lemmings: usize,
    /// Half-width of the square jitter applied on the ground plane at spawn.
    pub spawn_jitter: f32,
    /// Magnitude of the random nudge a new agent gets when it goes live.
    pub initial_impulse: f32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            spawn_anchor: Vec3::new(10.0, 5.0, -8.0),
            goal: Vec3::new(0.0, 5.0, 0.0),
            spawn_interval: 2.0,
            max_lemmings: 10,
            spawn_jitter: 1.0,
            initial_impulse: 2.0,
        }
    }
}

/// Everything the kernel needs to run a lemming scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub agent: AgentTuning,
    pub population: PopulationConfig,
    /// Seed for every random draw (speed, jitter, cosmetics, impulse).
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agent: AgentTuning::default(),
            population: PopulationConfig::default(),
            seed: 42,
        }
    }
}

impl SimConfig {
    /// Parse and validate YAML. Missing fields take their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&data)
    }

    /// Serialize the full config, defaults included.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the kernel cannot run with. Every float must be finite;
    /// NaN fails every check here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.agent;
        let p = &self.population;
        positive("agent.goal_dist", a.goal_dist)?;
        non_negative("agent.goal_time", a.goal_time)?;
        non_negative("agent.min_speed", a.min_speed)?;
        non_negative("agent.speed_range", a.speed_range)?;
        non_negative("agent.min_speed + agent.speed_range", a.min_speed + a.speed_range)?;
        non_negative("agent.force_scale", a.force_scale)?;
        finite_vec("population.spawn_anchor", p.spawn_anchor)?;
        finite_vec("population.goal", p.goal)?;
        positive("population.spawn_interval", p.spawn_interval)?;
        non_negative("population.spawn_jitter", p.spawn_jitter)?;
        non_negative("population.initial_impulse", p.initial_impulse)?;
        if p.max_lemmings == 0 {
            return Err(ConfigError::Invalid("population.max_lemmings must be at least 1".into()));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be finite and not negative, got {value}"
        )))
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be finite and positive, got {value}"
        )))
    }
}

fn finite_vec(field: &str, value: Vec3) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{field} must be finite, got {value}")))
    }
}
