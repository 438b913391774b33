//! Kernel: goal-seeking lemmings and the population that owns them.
//!
//! # Invariants
//! - An agent's result only moves `none -> in_goal -> achieved` or
//!   `in_goal -> none`; `achieved` is terminal.
//! - Within a tick: activation, then updates, then removal, then the spawn
//!   decision. The population never exceeds its ceiling after a tick.
//! - All randomness flows from one seeded RNG per population.
//! - Physics is reached only through [`PhysicsWorld`]; a missing body skips
//!   work instead of failing the tick.

pub mod agent;
pub mod config;
pub mod physics;
pub mod population;

pub use agent::{AgentController, GoalResult};
pub use config::{AgentTuning, ConfigError, PopulationConfig, SimConfig};
pub use physics::{BodyDesc, PhysicsError, PhysicsWorld, PointBody, PointMassWorld};
pub use population::{Lemming, Phase, PopulationManager, PopulationStats, SpawnError, TickReport};

pub fn crate_info() -> &'static str {
    "lemmings-kernel v0.1.0"
}
