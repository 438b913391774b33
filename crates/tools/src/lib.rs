//! Developer Tooling: population inspector and debug viewer toggles.
//!
//! # Invariants
//! - Tools read kernel state; they never mutate the population.
//! - Debug viewer state is owned by a session, never global.

mod debug;
mod inspector;

pub use debug::{DebugViewers, PhysicsViewer};
pub use inspector::{AgentInfo, PopulationInspector, PopulationSummary};

pub fn crate_info() -> &'static str {
    "lemmings-tools v0.1.0"
}
